//! Person facts, gender codes, calendar dates and field validation.
//!
//! [`Person`] holds only authoritative facts. Children are never stored on the
//! person; they are derived by [`normalize`](crate::relationships::normalize).
//! [`PersonRecord`] is the loose wire shape accepted from documents. Converting
//! it into a `Person` keeps every valid field and drops the invalid ones.

use crate::error::{FamilyTreeError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Unique, stable identifier of a person.
pub type PersonId = String;

/// Gender of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    /// Male (`M`)
    #[serde(rename = "M")]
    Male,
    /// Female (`F`)
    #[serde(rename = "F")]
    Female,
    /// Unknown or unspecified (`U`)
    #[default]
    #[serde(rename = "U")]
    Unknown,
}

impl Gender {
    /// Parse a gender code.
    ///
    /// Accepts `M`/`F`/`U` in either case and the words `male`, `female`,
    /// `unknown`. An empty string means unknown. Anything else is rejected.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Some(Gender::Male),
            "f" | "female" => Some(Gender::Female),
            "" | "u" | "unknown" => Some(Gender::Unknown),
            _ => None,
        }
    }

    /// Single-letter wire code.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unknown => "U",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which parent slot of a child a relation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentRole {
    /// The `father_id` slot
    Father,
    /// The `mother_id` slot
    Mother,
}

impl fmt::Display for ParentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentRole::Father => write!(f, "father"),
            ParentRole::Mother => write!(f, "mother"),
        }
    }
}

/// Parse a calendar date.
///
/// `YYYY` becomes January 1st of that year. `Y-M-D` accepts unpadded month and
/// day components but must name a real calendar day.
///
/// # Errors
///
/// Returns [`FamilyTreeError::InvalidDate`] for any other shape.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let invalid = || FamilyTreeError::InvalidDate {
        value: value.to_string(),
    };

    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = trimmed.parse().map_err(|_| invalid())?;
        return NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid);
    }

    let parts: Vec<&str> = trimmed.split('-').collect();
    let numeric = |p: &&str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if parts.len() != 3 || !parts.iter().all(numeric) {
        return Err(invalid());
    }

    let year: i32 = parts[0].parse().map_err(|_| invalid())?;
    let month: u32 = parts[1].parse().map_err(|_| invalid())?;
    let day: u32 = parts[2].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Field-keyed validation messages.
///
/// Empty means the record is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// True when no field has a message.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Messages for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(|v| v.as_slice())
    }

    /// Check if a field has messages.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterate over fields and their messages in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.fields.iter()
    }

    /// Consume into the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.fields
    }

    /// Returns `false` and records a message if death precedes birth.
    fn check_date_order(&mut self, birth: Option<NaiveDate>, death: Option<NaiveDate>) -> bool {
        if let (Some(birth), Some(death)) = (birth, death) {
            if birth > death {
                self.add("death_date", "Death date must not be before birth date");
                return false;
            }
        }
        true
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// A person in the family graph.
///
/// Relationship fields are references by id and may be dangling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,
    /// Display name (required, non-blank)
    pub name: String,
    /// Gender
    pub gender: Gender,
    /// Date of birth
    pub birth_date: Option<NaiveDate>,
    /// Date of death
    pub death_date: Option<NaiveDate>,
    /// Reference to the father
    pub father_id: Option<PersonId>,
    /// Reference to the mother
    pub mother_id: Option<PersonId>,
    /// Authoritative spouse references, in insertion order without duplicates
    pub spouse_ids: Vec<PersonId>,
    /// Position among siblings, used only for ordering
    pub birth_order: Option<u32>,
    /// Free text
    pub note: Option<String>,
}

impl Person {
    /// Create a person with a freshly generated UUID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), name)
    }

    /// Create a person with an explicit id.
    pub fn with_id(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender: Gender::Unknown,
            birth_date: None,
            death_date: None,
            father_id: None,
            mother_id: None,
            spouse_ids: Vec::new(),
            birth_order: None,
            note: None,
        }
    }

    /// Builder pattern: set gender.
    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Builder pattern: set birth date.
    pub fn born(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    /// Builder pattern: set death date.
    pub fn died(mut self, date: NaiveDate) -> Self {
        self.death_date = Some(date);
        self
    }

    /// Builder pattern: set father reference.
    pub fn father(mut self, id: impl Into<PersonId>) -> Self {
        self.father_id = Some(id.into());
        self
    }

    /// Builder pattern: set mother reference.
    pub fn mother(mut self, id: impl Into<PersonId>) -> Self {
        self.mother_id = Some(id.into());
        self
    }

    /// Builder pattern: add a spouse reference.
    pub fn spouse(mut self, id: impl Into<PersonId>) -> Self {
        self.add_spouse(id);
        self
    }

    /// Builder pattern: set birth order.
    pub fn birth_order(mut self, order: u32) -> Self {
        self.birth_order = Some(order);
        self
    }

    /// Builder pattern: set note.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Parent reference for a role.
    pub fn parent(&self, role: ParentRole) -> Option<&str> {
        match role {
            ParentRole::Father => self.father_id.as_deref(),
            ParentRole::Mother => self.mother_id.as_deref(),
        }
    }

    pub(crate) fn parent_slot(&mut self, role: ParentRole) -> &mut Option<PersonId> {
        match role {
            ParentRole::Father => &mut self.father_id,
            ParentRole::Mother => &mut self.mother_id,
        }
    }

    /// Father and mother references that are set, father first.
    pub fn parent_ids(&self) -> impl Iterator<Item = &str> {
        self.father_id.as_deref().into_iter().chain(self.mother_id.as_deref())
    }

    /// Add a spouse reference.
    ///
    /// Returns `false` if already present, empty, or the person's own id.
    pub fn add_spouse(&mut self, id: impl Into<PersonId>) -> bool {
        let id = id.into();
        if id.is_empty() || id == self.id || self.spouse_ids.contains(&id) {
            return false;
        }
        self.spouse_ids.push(id);
        true
    }

    /// Remove a spouse reference.
    ///
    /// Returns `false` if it was not present.
    pub fn remove_spouse(&mut self, id: &str) -> bool {
        let before = self.spouse_ids.len();
        self.spouse_ids.retain(|s| s != id);
        self.spouse_ids.len() != before
    }

    /// Check whether `id` is a registered spouse.
    pub fn is_spouse_of(&self, id: &str) -> bool {
        self.spouse_ids.iter().any(|s| s == id)
    }

    /// Validate the typed facts.
    ///
    /// Typed fields cannot hold a bad gender or negative birth order, so only
    /// the name and the date order are checked.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        errors.check_date_order(self.birth_date, self.death_date);
        errors
    }

    /// Convert to the wire record, attaching the derived children cache.
    pub fn to_record(&self, children: &[PersonId]) -> PersonRecord {
        PersonRecord {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            gender: Some(Value::from(self.gender.code())),
            birth_date: self.birth_date.map(|d| Value::from(d.format("%Y-%m-%d").to_string())),
            death_date: self.death_date.map(|d| Value::from(d.format("%Y-%m-%d").to_string())),
            birth_order: self.birth_order.map(Value::from),
            father_id: self.father_id.clone(),
            mother_id: self.mother_id.clone(),
            spouse_ids: self.spouse_ids.clone(),
            children_ids: children.to_vec(),
            note: self.note.clone(),
        }
    }
}

/// Loose input shape of a person as found in documents.
///
/// Deserializing a record never fails on a field. References and id list
/// items may be strings or numbers; anything else is ignored. The checked
/// scalars (`gender`, dates, `birth_order`) stay raw JSON so
/// [`validate`](Self::validate) can report what is wrong with them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRecord {
    /// Identifier (the document's map key takes precedence)
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    /// Display name
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Gender code
    pub gender: Option<Value>,
    /// `YYYY` or `YYYY-MM-DD`
    pub birth_date: Option<Value>,
    /// `YYYY` or `YYYY-MM-DD`
    pub death_date: Option<Value>,
    /// Position among siblings
    pub birth_order: Option<Value>,
    /// Father reference
    #[serde(deserialize_with = "lenient_string")]
    pub father_id: Option<String>,
    /// Mother reference
    #[serde(deserialize_with = "lenient_string")]
    pub mother_id: Option<String>,
    /// Spouse references
    #[serde(deserialize_with = "lenient_ids")]
    pub spouse_ids: Vec<String>,
    /// Non-authoritative cache of derived children, ignored on input
    #[serde(deserialize_with = "lenient_ids")]
    pub children_ids: Vec<String>,
    /// Free text
    #[serde(deserialize_with = "lenient_string")]
    pub note: Option<String>,
}

fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(scalar_string)
}

fn lenient_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_string).collect(),
        _ => Vec::new(),
    })
}

/// Checked scalar fields of a record. Invalid values are already dropped.
struct Facts {
    gender: Gender,
    birth_date: Option<NaiveDate>,
    death_date: Option<NaiveDate>,
    birth_order: Option<u32>,
}

impl PersonRecord {
    /// Collect every field problem of the record.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = self.facts().1;
        if !self.has_name() {
            errors.add("name", "Name is required");
        }
        errors
    }

    fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    fn facts(&self) -> (Facts, ValidationErrors) {
        let mut errors = ValidationErrors::new();

        let gender = match self.gender.as_ref() {
            None | Some(Value::Null) => Gender::Unknown,
            Some(value) => {
                let parsed = value.as_str().and_then(Gender::from_code);
                if parsed.is_none() {
                    errors.add("gender", format!("Gender must be one of M, F, U (got {value})"));
                }
                parsed.unwrap_or_default()
            }
        };

        let birth_order = match self.birth_order.as_ref() {
            None | Some(Value::Null) => None,
            Some(value) => {
                let parsed = value.as_u64().and_then(|o| u32::try_from(o).ok());
                if parsed.is_none() {
                    errors.add("birth_order", "Birth order must be a non-negative integer");
                }
                parsed
            }
        };

        let birth_date = checked_date("birth_date", self.birth_date.as_ref(), &mut errors);
        let mut death_date = checked_date("death_date", self.death_date.as_ref(), &mut errors);
        if !errors.check_date_order(birth_date, death_date) {
            death_date = None;
        }

        let facts = Facts {
            gender,
            birth_date,
            death_date,
            birth_order,
        };
        (facts, errors)
    }

    /// Convert into a typed person.
    ///
    /// `key` (the document map key) wins over the record's own id; with neither,
    /// a UUID is generated. Empty reference strings are treated as absent.
    /// Invalid fields are dropped: a bad gender becomes unknown, a bad date or
    /// birth order becomes absent, and a death date before the birth date is
    /// discarded. The returned [`ValidationErrors`] lists what was dropped.
    ///
    /// # Errors
    ///
    /// Returns every problem of the record if it has no name.
    pub fn into_person(
        self,
        key: Option<&str>,
    ) -> std::result::Result<(Person, ValidationErrors), ValidationErrors> {
        if !self.has_name() {
            return Err(self.validate());
        }
        let (facts, dropped) = self.facts();

        let id = key
            .map(str::to_string)
            .or(self.id)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut person = Person::with_id(id, self.name.unwrap_or_default().trim());
        person.gender = facts.gender;
        person.birth_date = facts.birth_date;
        person.death_date = facts.death_date;
        person.birth_order = facts.birth_order;
        person.father_id = self.father_id.filter(|id| !id.is_empty());
        person.mother_id = self.mother_id.filter(|id| !id.is_empty());
        for spouse in self.spouse_ids {
            person.add_spouse(spouse);
        }
        person.note = self.note.filter(|n| !n.is_empty());

        Ok((person, dropped))
    }
}

fn checked_date(
    field: &str,
    value: Option<&Value>,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let parsed = match value? {
        Value::Null => return None,
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => parse_date(s).ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.add(field, format!("{field} must be in YYYY or YYYY-MM-DD format"));
    }
    parsed
}
