use crate::record::{RecordSet, RecordType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Answer,
    Authority,
    Additional,
}

/// Per-section record-set views of a response under assembly.
///
/// The message tree itself belongs to response assembly; this structure is
/// the slice of it the filter is allowed to see, and flipping `suppressed`
/// on individual sets is the only mutation that ever flows back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMessage {
    answer: Vec<RecordSet>,
    authority: Vec<RecordSet>,
    additional: Vec<RecordSet>,
}

impl ResponseMessage {
    pub fn new() -> Self {
        Self::default()
    }

    fn section(&self, section: Section) -> &Vec<RecordSet> {
        match section {
            Section::Answer => &self.answer,
            Section::Authority => &self.authority,
            Section::Additional => &self.additional,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<RecordSet> {
        match section {
            Section::Answer => &mut self.answer,
            Section::Authority => &mut self.authority,
            Section::Additional => &mut self.additional,
        }
    }

    pub fn push(&mut self, section: Section, set: RecordSet) {
        self.section_mut(section).push(set);
    }

    pub fn get(
        &self,
        section: Section,
        name: &str,
        rtype: RecordType,
        covers: Option<RecordType>,
    ) -> Option<&RecordSet> {
        self.section(section)
            .iter()
            .find(|set| set.matches(name, rtype, covers))
    }

    pub fn find(
        &mut self,
        section: Section,
        name: &str,
        rtype: RecordType,
        covers: Option<RecordType>,
    ) -> Option<&mut RecordSet> {
        self.section_mut(section)
            .iter_mut()
            .find(|set| set.matches(name, rtype, covers))
    }

    pub fn contains(&self, section: Section, name: &str, rtype: RecordType) -> bool {
        self.get(section, name, rtype, None).is_some()
    }

    /// Distinct owner names in a section, in insertion order.
    pub fn names(&self, section: Section) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for set in self.section(section) {
            if !names.iter().any(|n| n == &set.name) {
                names.push(set.name.clone());
            }
        }
        names
    }

    pub fn sets(&self, section: Section) -> &[RecordSet] {
        self.section(section)
    }

    pub fn sets_mut(&mut self, section: Section) -> impl Iterator<Item = &mut RecordSet> {
        self.section_mut(section).iter_mut()
    }

    /// The sets an encoder would actually emit for a section.
    pub fn rendered(&self, section: Section) -> Vec<&RecordSet> {
        self.section(section)
            .iter()
            .filter(|set| !set.suppressed)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.answer.is_empty() && self.authority.is_empty() && self.additional.is_empty()
    }

    pub fn suppressed(&self, section: Section, name: &str, rtype: RecordType) -> bool {
        self.get(section, name, rtype, None)
            .map(|set| set.suppressed)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResponseMessage {
        let mut msg = ResponseMessage::new();
        msg.push(Section::Answer, RecordSet::new("example.com", RecordType::AAAA));
        msg.push(
            Section::Answer,
            RecordSet::rrsig("example.com", RecordType::AAAA),
        );
        msg.push(Section::Authority, RecordSet::new("example.com", RecordType::NS));
        msg.push(Section::Additional, RecordSet::new("ns1.example.com", RecordType::A));
        msg.push(
            Section::Additional,
            RecordSet::new("ns1.example.com", RecordType::AAAA),
        );
        msg
    }

    #[test]
    fn test_find_matches_name_case_insensitively() {
        let mut msg = sample();
        assert!(msg
            .find(Section::Answer, "EXAMPLE.COM.", RecordType::AAAA, None)
            .is_some());
        assert!(msg
            .find(Section::Answer, "other.com", RecordType::AAAA, None)
            .is_none());
    }

    #[test]
    fn test_find_distinguishes_rrsig_by_covered_type() {
        let mut msg = sample();
        assert!(msg
            .find(
                Section::Answer,
                "example.com",
                RecordType::RRSIG,
                Some(RecordType::AAAA)
            )
            .is_some());
        assert!(msg
            .find(
                Section::Answer,
                "example.com",
                RecordType::RRSIG,
                Some(RecordType::A)
            )
            .is_none());
    }

    #[test]
    fn test_names_are_distinct_in_insertion_order() {
        let msg = sample();
        assert_eq!(msg.names(Section::Additional), vec!["ns1.example.com"]);
        assert_eq!(msg.names(Section::Answer), vec!["example.com"]);
    }

    #[test]
    fn test_rendered_skips_suppressed_sets() {
        let mut msg = sample();
        msg.find(Section::Answer, "example.com", RecordType::AAAA, None)
            .unwrap()
            .suppress();
        let rendered = msg.rendered(Section::Answer);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].rtype, RecordType::RRSIG);
        assert!(msg.suppressed(Section::Answer, "example.com", RecordType::AAAA));
    }

    #[test]
    fn test_contains() {
        let msg = sample();
        assert!(msg.contains(Section::Additional, "ns1.example.com", RecordType::A));
        assert!(!msg.contains(Section::Additional, "ns2.example.com", RecordType::A));
    }
}
