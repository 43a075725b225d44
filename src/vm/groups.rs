//! Event marks: fixed-size group membership used by `set_event_mark`,
//! `delete_event_mark`, and `by_marks`, sized at construction from
//! [`crate::config::EngineConfig::max_event_groups`] so no allocation
//! happens once the engine is running.

use fnv::FnvHashMap;

use crate::note::NoteId;

/// Which marks (bits 0..`max_event_groups`) a note currently belongs to.
pub struct EventGroups {
    max_groups: usize,
    membership: FnvHashMap<NoteId, u64>,
}

impl EventGroups {
    pub fn new(max_groups: usize) -> Self {
        assert!(max_groups <= 64, "event marks are packed into a u64 bitset");
        Self { max_groups, membership: FnvHashMap::default() }
    }

    pub fn set_mark(&mut self, note: NoteId, group: usize) {
        if group >= self.max_groups {
            log::warn!("event mark group {group} out of range (max {})", self.max_groups);
            return;
        }
        *self.membership.entry(note).or_insert(0) |= 1 << group;
    }

    pub fn delete_mark(&mut self, note: NoteId, group: usize) {
        if group >= self.max_groups {
            log::warn!("event mark group {group} out of range (max {})", self.max_groups);
            return;
        }
        if let Some(bits) = self.membership.get_mut(&note) {
            *bits &= !(1 << group);
            if *bits == 0 {
                self.membership.remove(&note);
            }
        }
    }

    pub fn has_mark(&self, note: NoteId, group: usize) -> bool {
        self.membership.get(&note).map(|bits| bits & (1 << group) != 0).unwrap_or(false)
    }

    /// Writes every note id carrying `group`'s mark into `out`, returning
    /// how many were written.
    pub fn by_marks(&self, group: usize, out: &mut [NoteId]) -> usize {
        if group >= self.max_groups {
            log::warn!("event mark group {group} out of range (max {})", self.max_groups);
            return 0;
        }
        let bit = 1 << group;
        let mut n = 0;
        for (id, bits) in &self.membership {
            if bits & bit != 0 {
                if n >= out.len() {
                    break;
                }
                out[n] = *id;
                n += 1;
            }
        }
        n
    }

    pub fn forget_note(&mut self, note: NoteId) {
        self.membership.remove(&note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_query_mark() {
        let mut groups = EventGroups::new(32);
        groups.set_mark(NoteId(1), 3);
        assert!(groups.has_mark(NoteId(1), 3));
        assert!(!groups.has_mark(NoteId(1), 4));
    }

    #[test]
    fn by_marks_returns_members_of_one_group() {
        let mut groups = EventGroups::new(32);
        groups.set_mark(NoteId(1), 0);
        groups.set_mark(NoteId(1), 1);
        groups.set_mark(NoteId(2), 0);

        let mut out = [NoteId(0); 4];
        let n = groups.by_marks(0, &mut out);
        assert_eq!(n, 2);
        assert!(out[..n].contains(&NoteId(1)));
        assert!(out[..n].contains(&NoteId(2)));

        let n = groups.by_marks(1, &mut out);
        assert_eq!(n, 1);
        assert_eq!(out[0], NoteId(1));
    }

    #[test]
    fn delete_mark_clears_bit_and_prunes_empty_entry() {
        let mut groups = EventGroups::new(32);
        groups.set_mark(NoteId(1), 2);
        groups.delete_mark(NoteId(1), 2);
        assert!(!groups.has_mark(NoteId(1), 2));
    }
}
