//! Dogs and what is recorded for them

use crate::error::BookError;
use crate::history::{add_if_not_empty, add_text_if_not_empty, child_text, HistoryContext};
use crate::points::ExistingPoints;
use crate::schema::{attr, element};
use crate::trial::Trial;
use arb_tree::{ArbDate, Element};
use serde::{Deserialize, Serialize};

/// Title earned by a dog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DogTitle {
    pub date: Option<ArbDate>,
    pub venue: String,
    pub name: String,
    pub received: bool,
}

impl DogTitle {
    /// Create title earned on `date`
    #[inline]
    #[must_use]
    pub fn new(venue: impl Into<String>, name: impl Into<String>, date: Option<ArbDate>) -> Self {
        Self {
            date,
            venue: venue.into(),
            name: name.into(),
            received: false,
        }
    }

    /// Load from a `Title` element
    ///
    /// # Errors
    /// Missing attributes, or a title the venue does not define.
    pub fn load(tree: &Element, ctx: &mut HistoryContext<'_>) -> Result<Self, BookError> {
        tree.expect_name(element::TITLE)?;
        let title = Self {
            date: tree.optional(attr::TITLE_DATE)?,
            venue: tree.require(attr::TITLE_VENUE)?,
            name: tree.require(attr::TITLE_NAME)?,
            received: tree.optional(attr::TITLE_RECEIVED)?.unwrap_or(false),
        };
        if ctx.rejects_unknown()
            && !ctx
                .config()
                .venue(&title.venue)
                .is_some_and(|v| v.titles.contains(&title.name))
        {
            return Err(BookError::unknown("title", &[&title.venue, &title.name]));
        }
        Ok(title)
    }

    /// Append as a `Title` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::TITLE);
        if let Some(date) = self.date {
            e.add_attr(attr::TITLE_DATE, date);
        }
        e.add_attr(attr::TITLE_VENUE, &self.venue)
            .add_attr(attr::TITLE_NAME, &self.name);
        if self.received {
            e.add_attr(attr::TITLE_RECEIVED, true);
        }
    }
}

/// Registration number with a venue
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegNum {
    pub venue: String,
    pub number: String,
    pub height: String,
    pub received: bool,
    pub note: String,
}

impl RegNum {
    /// Create registration
    #[inline]
    #[must_use]
    pub fn new(venue: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            number: number.into(),
            ..Self::default()
        }
    }

    /// Load from a `RegNum` element
    ///
    /// # Errors
    /// Missing attributes, or an unknown venue.
    pub fn load(tree: &Element, ctx: &mut HistoryContext<'_>) -> Result<Self, BookError> {
        tree.expect_name(element::REG_NUM)?;
        let reg = Self {
            venue: tree.require(attr::REG_NUM_VENUE)?,
            number: tree.require(attr::REG_NUM_NUMBER)?,
            height: tree.optional(attr::REG_NUM_HEIGHT)?.unwrap_or_default(),
            received: tree.optional(attr::REG_NUM_RECEIVED)?.unwrap_or(false),
            note: tree.text(),
        };
        if ctx.rejects_unknown() && ctx.config().venue(&reg.venue).is_none() {
            return Err(BookError::unknown("venue", &[&reg.venue]));
        }
        Ok(reg)
    }

    /// Append as a `RegNum` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::REG_NUM);
        e.add_attr(attr::REG_NUM_VENUE, &self.venue)
            .add_attr(attr::REG_NUM_NUMBER, &self.number);
        add_if_not_empty(e, attr::REG_NUM_HEIGHT, &self.height);
        if self.received {
            e.add_attr(attr::REG_NUM_RECEIVED, true);
        }
        e.set_text(&self.note);
    }
}

/// One dog's record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    pub call_name: String,
    pub dob: Option<ArbDate>,
    pub deceased: Option<ArbDate>,
    pub registered_name: String,
    pub breed: String,
    pub note: String,
    pub existing_points: Vec<ExistingPoints>,
    pub reg_nums: Vec<RegNum>,
    pub titles: Vec<DogTitle>,
    pub trials: Vec<Trial>,
}

impl Dog {
    /// Create dog with nothing recorded
    #[inline]
    #[must_use]
    pub fn new(call_name: impl Into<String>) -> Self {
        Self {
            call_name: call_name.into(),
            ..Self::default()
        }
    }

    /// Append a trial
    #[inline]
    #[must_use]
    pub fn with_trial(mut self, trial: Trial) -> Self {
        self.trials.push(trial);
        self
    }

    /// Load from a `Dog` element; rejected records are logged and dropped
    ///
    /// # Errors
    /// Malformed dog attributes.
    pub fn load(tree: &Element, ctx: &mut HistoryContext<'_>) -> Result<Self, BookError> {
        tree.expect_name(element::DOG)?;
        let mut dog = Self {
            call_name: tree.optional(attr::DOG_CALL_NAME)?.unwrap_or_default(),
            dob: tree.optional(attr::DOG_DOB)?,
            deceased: tree.optional(attr::DOG_DECEASED)?,
            registered_name: child_text(tree, element::REG_NAME),
            breed: child_text(tree, element::BREED),
            note: child_text(tree, element::NOTE),
            ..Self::default()
        };
        let who = format!("dog '{}'", dog.call_name);
        dog.existing_points = ctx.load_each(tree, element::EXISTING_POINTS, &who, ExistingPoints::load);
        dog.reg_nums = ctx.load_each(tree, element::REG_NUM, &who, RegNum::load);
        dog.titles = ctx.load_each(tree, element::TITLE, &who, DogTitle::load);
        dog.trials = ctx.load_each(tree, element::TRIAL, &who, Trial::load);
        Ok(dog)
    }

    /// Append as a `Dog` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::DOG);
        e.add_attr(attr::DOG_CALL_NAME, &self.call_name);
        if let Some(dob) = self.dob {
            e.add_attr(attr::DOG_DOB, dob);
        }
        if let Some(deceased) = self.deceased {
            e.add_attr(attr::DOG_DECEASED, deceased);
        }
        add_text_if_not_empty(e, element::REG_NAME, &self.registered_name);
        add_text_if_not_empty(e, element::BREED, &self.breed);
        add_text_if_not_empty(e, element::NOTE, &self.note);
        for points in &self.existing_points {
            points.save(e);
        }
        for reg in &self.reg_nums {
            reg.save(e);
        }
        for title in &self.titles {
            title.save(e);
        }
        for trial in &self.trials {
            trial.save(e);
        }
    }
}

/// Every dog in a record book, in entry order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DogList {
    dogs: Vec<Dog>,
}

impl DogList {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dog
    #[inline]
    pub fn push(&mut self, dog: Dog) {
        self.dogs.push(dog);
    }

    /// Number of dogs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    /// Check if list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    /// Iterate dogs
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Dog> {
        self.dogs.iter()
    }

    /// Iterate dogs mutably
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Dog> {
        self.dogs.iter_mut()
    }

    /// Dog by call name
    #[must_use]
    pub fn find(&self, call_name: &str) -> Option<&Dog> {
        self.dogs.iter().find(|d| d.call_name == call_name)
    }

    /// Load every `Dog` child of `tree`
    pub fn load(tree: &Element, ctx: &mut HistoryContext<'_>) -> Self {
        Self {
            dogs: ctx.load_each(tree, element::DOG, "dog", Dog::load),
        }
    }

    /// Append every dog to `parent`
    pub fn save(&self, parent: &mut Element) {
        for dog in &self.dogs {
            dog.save(parent);
        }
    }
}

impl FromIterator<Dog> for DogList {
    fn from_iter<I: IntoIterator<Item = Dog>>(iter: I) -> Self {
        Self {
            dogs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DogList {
    type Item = &'a Dog;
    type IntoIter = std::slice::Iter<'a, Dog>;

    fn into_iter(self) -> Self::IntoIter {
        self.dogs.iter()
    }
}

impl<'a> IntoIterator for &'a mut DogList {
    type Item = &'a mut Dog;
    type IntoIter = std::slice::IterMut<'a, Dog>;

    fn into_iter(self) -> Self::IntoIter {
        self.dogs.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::PointsKind;
    use arb_config::{Configuration, Title, Venue};
    use arb_tree::{MessageLog, SchemaVersion};
    use pretty_assertions::assert_eq;

    fn config() -> Configuration {
        let mut venue = Venue::new("AKC");
        venue.titles.add(Title::new("MX")).unwrap();
        let mut config = Configuration::new();
        config.venues.add(venue).unwrap();
        config
    }

    fn dog() -> Dog {
        let mut dog = Dog::new("Tess");
        dog.dob = ArbDate::from_ymd(2015, 2, 1);
        dog.breed = "Border Collie".into();
        dog.reg_nums.push(RegNum::new("AKC", "SR12345"));
        dog.titles.push(DogTitle::new("AKC", "MX", ArbDate::from_ymd(2018, 7, 1)));
        dog
    }

    #[test]
    fn save_then_load_is_identity() {
        let config = config();
        let mut book = Element::new(element::BOOK);
        DogList::from_iter([dog()]).save(&mut book);

        let mut log = MessageLog::new();
        let mut ctx = HistoryContext::new(&config, SchemaVersion::CURRENT, &mut log);
        let dogs = DogList::load(&book, &mut ctx);
        assert_eq!(dogs.find("Tess"), Some(&dog()));
        assert!(log.is_empty(), "{}", log.joined());
    }

    #[test]
    fn unknown_references_dropped_unless_allowed() {
        let config = config();
        let mut d = dog();
        d.titles.push(DogTitle::new("AKC", "XYZ", None));
        d.existing_points.push(ExistingPoints::new(PointsKind::Speed, "CPE", 5.0).with_class("C", "L", ""));
        let mut book = Element::new(element::BOOK);
        d.save(&mut book);

        let mut log = MessageLog::new();
        let mut ctx = HistoryContext::new(&config, SchemaVersion::CURRENT, &mut log);
        let strict = DogList::load(&book, &mut ctx);
        assert_eq!(strict.find("Tess").map(|d| d.titles.len()), Some(1));
        assert_eq!(log.messages().len(), 2);

        let mut log = MessageLog::new();
        let mut ctx =
            HistoryContext::new(&config, SchemaVersion::CURRENT, &mut log).with_reject_unknown(false);
        let lenient = DogList::load(&book, &mut ctx);
        assert_eq!(lenient.find("Tess"), Some(&d));
        assert!(log.is_empty());
    }
}
