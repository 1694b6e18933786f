//! Testing utilities for the ARB workspace
//!
//! Shared fixtures, a scripted callback, and tracing setup.

#![allow(missing_docs)]

use arb_book::{AgilityRecordBook, Club, Dog, DogList, DogTitle, ExistingPoints, PointsKind, RegNum, Run, RunScoring, Trial};
use arb_config::{
    Configuration, Division, Event, Level, MatchKey, MultiQ, OtherPoints, ScoringRule, ScoringStyle, Title, Venue,
};
use arb_scoring::QStatus;
use arb_tree::{ArbDate, ErrorCallback};

/// Install a test-writer subscriber filtered by `RUST_LOG`; repeat calls are harmless
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Callback answering every confirmation the same way and recording calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingCallback {
    answer: bool,
    stop: bool,
    pub confirms: Vec<String>,
    pub logs: Vec<String>,
}

impl RecordingCallback {
    /// Say yes to everything
    pub fn approving() -> Self {
        Self {
            answer: true,
            stop: false,
            confirms: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Say no to every confirmation
    pub fn declining() -> Self {
        Self {
            answer: false,
            ..Self::approving()
        }
    }

    /// Decline and stop the batch at the first confirmation
    pub fn cancelling() -> Self {
        Self {
            stop: true,
            ..Self::declining()
        }
    }
}

impl ErrorCallback for RecordingCallback {
    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.answer
    }

    fn can_continue(&self) -> bool {
        !(self.stop && !self.confirms.is_empty())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> Option<ArbDate> {
    ArbDate::from_ymd(y, m, d)
}

fn flat_division(name: &str, levels: &[&str]) -> Division {
    let mut division = Division::new(name);
    for level in levels {
        division.levels.add(Level::new(*level)).unwrap();
    }
    division
}

fn timed_event(name: &str) -> Event {
    Event::new(name).with_scoring(
        ScoringRule::new(MatchKey::Wildcard, MatchKey::Wildcard, ScoringStyle::FaultsThenTime)
            .with_clean_q(true)
            .with_title_points(&[(0.0, 10.0)]),
    )
}

/// AKC and USDAA with one other-points tally
///
/// AKC has divisions `Regular` and `Preferred` (levels `Novice`, `Open`,
/// `Excellent`), events `Standard` and `JWW`, a `Double Q` over both
/// Regular/Excellent events and the titles `NA`, `OA`, `MX` and `MACH`.
pub fn sample_configuration() -> Configuration {
    let mut akc = Venue::new("AKC").with_long_name("American Kennel Club");
    for division in ["Regular", "Preferred"] {
        akc.divisions
            .add(flat_division(division, &["Novice", "Open", "Excellent"]))
            .unwrap();
    }
    for event in ["Standard", "JWW"] {
        akc.events.add(timed_event(event)).unwrap();
    }
    akc.multi_qs
        .add(
            MultiQ::new("Double Q", "QQ")
                .with_item("Regular", "Excellent", "Standard")
                .unwrap()
                .with_item("Regular", "Excellent", "JWW")
                .unwrap(),
        )
        .unwrap();
    for title in ["NA", "OA", "MX", "MACH"] {
        akc.titles.add(Title::new(title)).unwrap();
    }

    let mut usdaa = Venue::new("USDAA");
    usdaa
        .divisions
        .add(flat_division("Championship", &["Starters", "Advanced", "Masters"]))
        .unwrap();
    usdaa.events.add(timed_event("Jumpers")).unwrap();
    for title in ["AD", "MAD"] {
        usdaa.titles.add(Title::new(title)).unwrap();
    }

    let mut config = Configuration::new().with_version(3);
    config.venues.add(akc).unwrap();
    config.venues.add(usdaa).unwrap();
    config.other_points.add(OtherPoints::new("Breed")).unwrap();
    config
}

pub fn qualified_run(date: Option<ArbDate>, division: &str, level: &str, event: &str) -> Run {
    Run::new(date, division, level, event)
        .with_scoring(RunScoring::by_time(32.5, 40.0, 0.0))
        .with_result(QStatus::Qualified, 1, 8)
}

/// `Tess` runs AKC Regular, `Pip` runs USDAA
///
/// Tess has two Novice runs and two Excellent runs, Novice existing points
/// and a Breed other-points entry.
pub fn sample_dogs() -> DogList {
    let mut tess = Dog::new("Tess");
    tess.dob = date(2016, 5, 4);
    tess.breed = "Border Collie".into();
    tess.reg_nums.push(RegNum::new("AKC", "SR12345"));
    tess.titles.push(DogTitle::new("AKC", "NA", date(2021, 6, 12)));
    tess.existing_points.push(
        ExistingPoints::new(PointsKind::Runs, "AKC", 10.0).with_class("Regular", "Novice", "Standard"),
    );
    tess.existing_points.push(
        ExistingPoints::new(PointsKind::Other, "AKC", 2.0)
            .with_class("Regular", "Excellent", "Standard")
            .with_other("Breed"),
    );
    let mut trial = Trial::new(Club::new("Sunny Dog Club", "AKC"))
        .with_run(qualified_run(date(2022, 4, 2), "Regular", "Novice", "Standard"))
        .with_run(qualified_run(date(2022, 4, 2), "Regular", "Novice", "JWW"))
        .with_run(qualified_run(date(2022, 4, 3), "Regular", "Excellent", "Standard"))
        .with_run(qualified_run(date(2022, 4, 3), "Regular", "Excellent", "JWW"));
    trial.location = "Springfield".into();
    tess.trials.push(trial);

    let mut pip = Dog::new("Pip");
    pip.breed = "Papillon".into();
    pip.titles.push(DogTitle::new("USDAA", "AD", date(2020, 9, 19)));
    pip.trials.push(
        Trial::new(Club::new("Hoopers", "USDAA"))
            .with_run(qualified_run(date(2022, 5, 7), "Championship", "Masters", "Jumpers")),
    );

    [tess, pip].into_iter().collect()
}

pub fn sample_book() -> AgilityRecordBook {
    AgilityRecordBook {
        config: sample_configuration(),
        dogs: sample_dogs(),
    }
}
