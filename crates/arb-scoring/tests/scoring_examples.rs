//! End-to-end scoring through a configured venue

use arb_config::{Configuration, Division, Event, Level, MatchKey, ScoringRule, ScoringStyle, Venue};
use arb_scoring::{FormulaRegistry, QStatus, RunMeasurements, ScoringError, ScoringResolver};
use arb_tree::ArbDate;
use pretty_assertions::assert_eq;

fn config() -> Configuration {
    let mut venue = Venue::new("T2B").with_points_type("T2B");
    let mut division = Division::new("Open");
    division
        .levels
        .add(Level::new("Novice").with_sub_levels(&["Novice A", "Novice B"]).unwrap())
        .unwrap();
    division.levels.add(Level::new("Masters")).unwrap();
    venue.divisions.add(division).unwrap();

    let jumpers = Event::new("Jumpers")
        .with_scoring(
            ScoringRule::new(MatchKey::exact("Open"), MatchKey::Wildcard, ScoringStyle::FaultsThenTime)
                .with_clean_q(true)
                .with_title_points(&[(0.0, 1.0)])
                .with_speed_points(&[])
                .with_window(None, ArbDate::from_ymd(2014, 12, 31)),
        )
        .with_scoring(
            ScoringRule::new(MatchKey::exact("Open"), MatchKey::Wildcard, ScoringStyle::FaultsThenTime)
                .with_clean_q(true)
                .with_title_points(&[(0.0, 2.0)])
                .with_speed_points(&[])
                .with_window(ArbDate::from_ymd(2015, 1, 1), None),
        );
    venue.events.add(jumpers).unwrap();

    let mut config = Configuration::new();
    config.venues.add(venue).unwrap();
    config
}

#[test]
fn clean_run_is_scored_by_the_rule_in_force() {
    let config = config();
    let resolver = ScoringResolver::new(&config);
    let registry = FormulaRegistry::with_defaults();
    let venue = resolver.venue("T2B").unwrap();
    let calc = arb_scoring::ScoreCalculator::new(registry.select(&venue.points_type).unwrap());

    let date = ArbDate::from_ymd(2016, 3, 12);
    let rule = resolver.find("T2B", "Jumpers", "Open", "Novice B", date).unwrap();
    let run = RunMeasurements::new().with_date(date).with_time(40.0, 40.0).with_place(1, 12);
    let outcome = calc.calculate(rule, &run);

    assert_eq!(outcome.q, QStatus::Qualified);
    let points = outcome.points.unwrap();
    assert!((points.title - 2.0).abs() < f64::EPSILON);
    assert!((points.speed - 10.0).abs() < f64::EPSILON);

    let older = resolver
        .find("T2B", "Jumpers", "Open", "Masters", ArbDate::from_ymd(2010, 1, 1))
        .unwrap();
    assert!((older.title_points.lookup(0.0) - 1.0).abs() < f64::EPSILON);
}

#[test]
fn step_table_examples() {
    let config = config();
    let resolver = ScoringResolver::new(&config);
    let registry = FormulaRegistry::with_defaults();
    let calc = arb_scoring::ScoreCalculator::new(registry.select("T2B").unwrap());
    let rule = resolver.find("T2B", "Jumpers", "Open", "Masters", None).unwrap();

    let speed = |elapsed: f64| {
        let run = RunMeasurements::new().with_time(elapsed, 40.0).with_place(1, 12);
        calc.calculate(rule, &run).points.map(|p| p.speed)
    };
    assert_eq!(speed(40.0), Some(10.0));
    // Time faults are off, so slow runs still qualify
    assert_eq!(speed(44.0), Some(9.0));
    assert_eq!(speed(80.0), Some(0.0));
}

#[test]
fn unknown_names_are_errors() {
    let config = config();
    let resolver = ScoringResolver::new(&config);
    assert_eq!(
        resolver.find("T2B", "Snooker", "Open", "Masters", None).unwrap_err(),
        ScoringError::UnknownEvent {
            venue: "T2B".into(),
            event: "Snooker".into()
        }
    );
    assert!(matches!(
        resolver.find("T2B", "Jumpers", "Veterans", "Masters", None),
        Err(ScoringError::NoRule { .. })
    ));
    assert!(!resolver.verify("T2B", "Jumpers", "Open", "Starters", None));
}
