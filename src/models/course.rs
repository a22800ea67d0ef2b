//! Course, offering, and section models.
//!
//! A course carries the weekly hour requirements and resource flags.
//! An offering opens a course in an academic period; each offering is
//! split into one or more sections (groups) that are timetabled
//! independently.
//!
//! # Session Structure
//! Every section needs `theoretical_hours` of theory and
//! `practical_hours` of practice per week. The course's
//! [`SessionPolicy`] decides whether both kinds form one contiguous
//! block or may be placed independently.

use serde::{Deserialize, Serialize};

/// A course in a study plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Catalog code (e.g., "CS101").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Cohort number. Sections sharing a cycle may never overlap in time.
    pub cycle: u32,
    /// Weekly theory hours.
    pub theoretical_hours: u32,
    /// Weekly practice hours.
    pub practical_hours: u32,
    /// Whether a teacher must be bound to every placement.
    pub requires_teacher: bool,
    /// Whether theory sessions need a lecture room.
    pub requires_room: bool,
    /// Whether practice sessions need a lab.
    pub requires_lab: bool,
    /// How theory and practice hours are laid out.
    #[serde(default)]
    pub session_policy: SessionPolicy,
}

/// Whether theory and practice form one block or are placed independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// Theory followed by practice in one contiguous block.
    Combined,
    /// Theory and practice may land on different days and hours.
    #[default]
    Separate,
}

/// Kind of class session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// Lecture hours, held in a lecture room.
    Theory,
    /// Hands-on hours, held in a lab.
    Practice,
}

impl SessionType {
    /// Lowercase label used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            SessionType::Theory => "theory",
            SessionType::Practice => "practice",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A course opened in an academic period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offering {
    /// Unique offering identifier.
    pub id: String,
    /// Offered course.
    pub course_id: String,
    /// Period the offering belongs to.
    pub period_id: String,
    /// Seats per section when the section sets none.
    pub default_capacity: Option<u32>,
    /// Configured number of sections.
    pub num_groups: u32,
}

/// A section (group) of an offering; the unit that gets timetabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique section identifier.
    pub id: String,
    /// Section code within its offering (e.g., "1", "2").
    pub code: String,
    /// Parent offering.
    pub offering_id: String,
    /// Seats required by this section, overriding the offering default.
    pub capacity: Option<u32>,
}

impl Course {
    /// Creates a course with no hours and no resource requirements.
    pub fn new(id: impl Into<String>, cycle: u32) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            name: String::new(),
            cycle,
            theoretical_hours: 0,
            practical_hours: 0,
            requires_teacher: false,
            requires_room: false,
            requires_lab: false,
            session_policy: SessionPolicy::Separate,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the catalog code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets weekly theory and practice hours.
    pub fn with_hours(mut self, theoretical: u32, practical: u32) -> Self {
        self.theoretical_hours = theoretical;
        self.practical_hours = practical;
        self
    }

    /// Requires a teacher on every placement.
    pub fn requiring_teacher(mut self) -> Self {
        self.requires_teacher = true;
        self
    }

    /// Requires a lecture room for theory.
    pub fn requiring_room(mut self) -> Self {
        self.requires_room = true;
        self
    }

    /// Requires a lab for practice.
    pub fn requiring_lab(mut self) -> Self {
        self.requires_lab = true;
        self
    }

    /// Sets the session policy.
    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.session_policy = policy;
        self
    }

    /// Total weekly hours (theory + practice), saturating at `u32::MAX`.
    #[inline]
    pub fn total_hours(&self) -> u32 {
        self.theoretical_hours.saturating_add(self.practical_hours)
    }

    /// Non-zero segments in theory-then-practice order.
    pub fn segments(&self) -> Vec<(SessionType, u32)> {
        let mut segments = Vec::with_capacity(2);
        if self.theoretical_hours > 0 {
            segments.push((SessionType::Theory, self.theoretical_hours));
        }
        if self.practical_hours > 0 {
            segments.push((SessionType::Practice, self.practical_hours));
        }
        segments
    }

    /// Whether sessions of the given type need a room of their category.
    pub fn requires_space_for(&self, session_type: SessionType) -> bool {
        match session_type {
            SessionType::Theory => self.requires_room,
            SessionType::Practice => self.requires_lab,
        }
    }
}

impl Offering {
    /// Creates an offering with one section and no default capacity.
    pub fn new(
        id: impl Into<String>,
        course_id: impl Into<String>,
        period_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            course_id: course_id.into(),
            period_id: period_id.into(),
            default_capacity: None,
            num_groups: 1,
        }
    }

    /// Sets the default section capacity.
    pub fn with_default_capacity(mut self, capacity: u32) -> Self {
        self.default_capacity = Some(capacity);
        self
    }

    /// Replaces this offering's sections with `n` fresh ones.
    ///
    /// Sections are coded "1".."n" and identified as `"{offering}-{code}"`.
    /// The caller discards any previous sections of the offering (and their
    /// placements) and stores the returned list in their place.
    pub fn resize_sections(&mut self, n: u32) -> Vec<Section> {
        self.num_groups = n;
        (1..=n)
            .map(|i| Section::new(format!("{}-{i}", self.id), i.to_string(), &self.id))
            .collect()
    }
}

impl Section {
    /// Creates a section with no capacity override.
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        offering_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            offering_id: offering_id.into(),
            capacity: None,
        }
    }

    /// Sets the required seat count.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Seats a room must offer: own capacity, else offering default, minimum 1.
    pub fn effective_capacity(&self, offering: &Offering) -> u32 {
        self.capacity
            .or(offering.default_capacity)
            .unwrap_or(1)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::new("C1", 3)
            .with_name("Databases")
            .with_code("CS301")
            .with_hours(2, 4)
            .requiring_teacher()
            .requiring_lab()
            .with_policy(SessionPolicy::Combined);

        assert_eq!(c.code, "CS301");
        assert_eq!(c.cycle, 3);
        assert_eq!(c.total_hours(), 6);
        assert!(c.requires_teacher);
        assert!(!c.requires_room);
        assert!(c.requires_space_for(SessionType::Practice));
        assert!(!c.requires_space_for(SessionType::Theory));
        assert_eq!(c.session_policy, SessionPolicy::Combined);
    }

    #[test]
    fn test_total_hours_saturates() {
        let c = Course::new("C1", 1).with_hours(u32::MAX, 3);
        assert_eq!(c.total_hours(), u32::MAX);
    }

    #[test]
    fn test_segments_skip_zero_hours() {
        let theory_only = Course::new("C1", 1).with_hours(3, 0);
        assert_eq!(theory_only.segments(), vec![(SessionType::Theory, 3)]);

        let both = Course::new("C2", 1).with_hours(2, 2);
        assert_eq!(
            both.segments(),
            vec![(SessionType::Theory, 2), (SessionType::Practice, 2)]
        );

        assert!(Course::new("C3", 1).segments().is_empty());
    }

    #[test]
    fn test_default_policy_is_separate() {
        let json = r#"{"id":"C1","code":"C1","name":"","cycle":1,
            "theoretical_hours":2,"practical_hours":0,"requires_teacher":false,
            "requires_room":true,"requires_lab":false}"#;
        let c: Course = serde_json::from_str(json).unwrap();
        assert_eq!(c.session_policy, SessionPolicy::Separate);
    }

    #[test]
    fn test_effective_capacity_fallbacks() {
        let offering = Offering::new("O1", "C1", "P1").with_default_capacity(30);
        let own = Section::new("S1", "1", "O1").with_capacity(45);
        let inherited = Section::new("S2", "2", "O1");
        assert_eq!(own.effective_capacity(&offering), 45);
        assert_eq!(inherited.effective_capacity(&offering), 30);

        let bare = Offering::new("O2", "C1", "P1");
        assert_eq!(inherited.effective_capacity(&bare), 1);
        let zero = Section::new("S3", "1", "O2").with_capacity(0);
        assert_eq!(zero.effective_capacity(&bare), 1);
    }

    #[test]
    fn test_resize_sections() {
        let mut offering = Offering::new("O1", "C1", "P1");
        let sections = offering.resize_sections(3);
        assert_eq!(offering.num_groups, 3);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].id, "O1-1");
        assert_eq!(sections[2].code, "3");
        assert!(sections.iter().all(|s| s.offering_id == "O1"));

        assert!(offering.resize_sections(0).is_empty());
        assert_eq!(offering.num_groups, 0);
    }
}
