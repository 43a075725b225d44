//! Background reclamation of data handed off the audio thread.
//!
//! The VM swaps things like a note's retired child-note list or a
//! recompiled callback's old handler table through a `basedrop::Shared`
//! instead of dropping them in place, so their eventual deallocation
//! doesn't cost the audio thread a `free()` call. This thread is what
//! actually runs those deallocations, off to the side, on its own
//! schedule.

use basedrop::Collector;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

static WAIT_INTERVAL: Duration = Duration::from_millis(10);

pub(crate) fn run_garbage_collector_thread(
    mut collector: Collector,
    interval: Duration,
    run: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut last_collect = Instant::now();

        while run.load(Ordering::Relaxed) {
            if last_collect.elapsed() >= interval {
                collector.collect();

                last_collect = Instant::now();

                log::trace!("Garbage collected");
            }

            std::thread::sleep(WAIT_INTERVAL);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use basedrop::{Handle, Shared};

    #[test]
    fn collector_reclaims_dropped_shared_handles() {
        let collector = Collector::new();
        let handle: Handle = collector.handle();

        {
            let _shared: Shared<Vec<u8>> = Shared::new(&handle, vec![0u8; 16]);
        }

        let run = Arc::new(AtomicBool::new(true));
        let gc_thread =
            run_garbage_collector_thread(collector, Duration::from_millis(1), Arc::clone(&run));

        std::thread::sleep(Duration::from_millis(20));
        run.store(false, Ordering::SeqCst);
        gc_thread.join().unwrap();
    }
}
