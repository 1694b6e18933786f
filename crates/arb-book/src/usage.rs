//! Counting and cascading configuration names through recorded history
//!
//! Action commands count how many records name an entity before deleting
//! it, then rewrite or remove those records. A trial belongs to every venue
//! one of its hosting clubs belongs to.

use crate::dog::DogList;
use crate::points::{ExistingPoints, PointsKind};
use crate::trial::{Club, Run, Trial};
use arb_config::Configuration;

impl DogList {
    fn points(&self) -> impl Iterator<Item = &ExistingPoints> {
        self.iter().flat_map(|d| d.existing_points.iter())
    }

    fn points_mut(&mut self) -> impl Iterator<Item = &mut ExistingPoints> {
        self.iter_mut().flat_map(|d| d.existing_points.iter_mut())
    }

    fn trials(&self) -> impl Iterator<Item = &Trial> {
        self.iter().flat_map(|d| d.trials.iter())
    }

    fn venue_runs<'a>(&'a self, venue: &'a str) -> impl Iterator<Item = &'a Run> + 'a {
        self.trials()
            .filter(move |t| t.has_venue(venue))
            .flat_map(|t| t.runs.iter())
    }

    fn venue_runs_mut<'a>(&'a mut self, venue: &'a str) -> impl Iterator<Item = &'a mut Run> + 'a {
        self.iter_mut()
            .flat_map(|d| d.trials.iter_mut())
            .filter(move |t| t.has_venue(venue))
            .flat_map(|t| t.runs.iter_mut())
    }

    fn delete_points(&mut self, pred: impl Fn(&ExistingPoints) -> bool) -> usize {
        let mut removed = 0;
        for dog in self.iter_mut() {
            let before = dog.existing_points.len();
            dog.existing_points.retain(|p| !pred(p));
            removed += before - dog.existing_points.len();
        }
        removed
    }

    /// Remove matching runs of `venue` trials; trials emptied here go too
    fn delete_runs(&mut self, venue: &str, pred: impl Fn(&[Club], &Run) -> bool) -> usize {
        let mut removed = 0;
        for dog in self.iter_mut() {
            dog.trials.retain_mut(|trial| {
                if !trial.has_venue(venue) || trial.runs.is_empty() {
                    return true;
                }
                let clubs = &trial.clubs;
                let before = trial.runs.len();
                trial.runs.retain(|run| !pred(clubs, run));
                removed += before - trial.runs.len();
                !trial.runs.is_empty()
            });
        }
        removed
    }

    /// Records referencing `venue`: existing points, registrations, titles
    /// and trials
    #[must_use]
    pub fn count_venue(&self, venue: &str) -> usize {
        self.iter()
            .map(|dog| {
                dog.existing_points.iter().filter(|p| p.venue == venue).count()
                    + dog.reg_nums.iter().filter(|r| r.venue == venue).count()
                    + dog.titles.iter().filter(|t| t.venue == venue).count()
                    + dog.trials.iter().filter(|t| t.has_venue(venue)).count()
            })
            .sum()
    }

    /// Repoint every record of venue `old` to `new`
    pub fn rename_venue(&mut self, old: &str, new: &str) -> usize {
        let mut count = 0;
        for dog in self.iter_mut() {
            let venues = dog
                .existing_points
                .iter_mut()
                .map(|p| &mut p.venue)
                .chain(dog.reg_nums.iter_mut().map(|r| &mut r.venue))
                .chain(dog.titles.iter_mut().map(|t| &mut t.venue))
                .chain(
                    dog.trials
                        .iter_mut()
                        .flat_map(|t| t.clubs.iter_mut())
                        .map(|c| &mut c.venue),
                );
            for venue in venues.filter(|v| v.as_str() == old) {
                *venue = new.to_string();
                count += 1;
            }
        }
        count
    }

    /// Remove every record of `venue`
    ///
    /// Clubs of the venue leave their trials; a trial left without clubs is
    /// removed with its runs.
    pub fn delete_venue(&mut self, venue: &str) -> usize {
        let mut count = 0;
        for dog in self.iter_mut() {
            let before = dog.existing_points.len() + dog.reg_nums.len() + dog.titles.len();
            dog.existing_points.retain(|p| p.venue != venue);
            dog.reg_nums.retain(|r| r.venue != venue);
            dog.titles.retain(|t| t.venue != venue);
            count += before - dog.existing_points.len() - dog.reg_nums.len() - dog.titles.len();
            dog.trials.retain_mut(|trial| {
                if !trial.has_venue(venue) {
                    return true;
                }
                count += 1;
                trial.clubs.retain(|c| c.venue != venue);
                !trial.clubs.is_empty()
            });
        }
        count
    }

    /// Runs and existing points recorded in `division` of `venue`
    #[must_use]
    pub fn count_division(&self, venue: &str, division: &str) -> usize {
        self.venue_runs(venue).filter(|r| r.division == division).count()
            + self.points().filter(|p| p.in_division(venue, division)).count()
    }

    /// Repoint runs and existing points from division `old` to `new`
    pub fn rename_division(&mut self, venue: &str, old: &str, new: &str) -> usize {
        let mut count = 0;
        for run in self.venue_runs_mut(venue).filter(|r| r.division == old) {
            run.division = new.to_string();
            count += 1;
        }
        for points in self.points_mut().filter(|p| p.in_division(venue, old)) {
            points.division = new.to_string();
            count += 1;
        }
        count
    }

    /// Remove runs and existing points in `division` of `venue`
    ///
    /// A run is only removed when its trial has exactly one hosting venue
    /// defining the division; otherwise it may belong to another venue.
    pub fn delete_division(&mut self, config: &Configuration, venue: &str, division: &str) -> usize {
        let runs = self.delete_runs(venue, |clubs, run| {
            run.division == division && venues_with_division(clubs, config, division) == 1
        });
        runs + self.delete_points(|p| p.in_division(venue, division))
    }

    /// Runs and existing points recorded at leaf `level`
    #[must_use]
    pub fn count_level(&self, venue: &str, division: &str, level: &str) -> usize {
        self.venue_runs(venue)
            .filter(|r| r.division == division && r.level == level)
            .count()
            + self
                .points()
                .filter(|p| p.in_division(venue, division) && p.level == level)
                .count()
    }

    /// Repoint leaf level `old` to `new`
    pub fn rename_level(&mut self, venue: &str, division: &str, old: &str, new: &str) -> usize {
        let mut count = 0;
        for run in self
            .venue_runs_mut(venue)
            .filter(|r| r.division == division && r.level == old)
        {
            run.level = new.to_string();
            count += 1;
        }
        for points in self
            .points_mut()
            .filter(|p| p.in_division(venue, division) && p.level == old)
        {
            points.level = new.to_string();
            count += 1;
        }
        count
    }

    /// Remove runs and existing points at leaf `level`
    pub fn delete_level(&mut self, venue: &str, division: &str, level: &str) -> usize {
        self.delete_runs(venue, |_, r| r.division == division && r.level == level)
            + self.delete_points(|p| p.in_division(venue, division) && p.level == level)
    }

    /// Titles of `venue` named `title`
    #[must_use]
    pub fn count_title(&self, venue: &str, title: &str) -> usize {
        self.iter()
            .flat_map(|d| d.titles.iter())
            .filter(|t| t.venue == venue && t.name == title)
            .count()
    }

    /// Rename earned titles
    pub fn rename_title(&mut self, venue: &str, old: &str, new: &str) -> usize {
        let mut count = 0;
        for title in self
            .iter_mut()
            .flat_map(|d| d.titles.iter_mut())
            .filter(|t| t.venue == venue && t.name == old)
        {
            title.name = new.to_string();
            count += 1;
        }
        count
    }

    /// Remove earned titles
    pub fn delete_title(&mut self, venue: &str, title: &str) -> usize {
        let mut count = 0;
        for dog in self.iter_mut() {
            let before = dog.titles.len();
            dog.titles.retain(|t| !(t.venue == venue && t.name == title));
            count += before - dog.titles.len();
        }
        count
    }

    /// Runs and existing points naming `event`
    #[must_use]
    pub fn count_event(&self, venue: &str, event: &str) -> usize {
        self.venue_runs(venue).filter(|r| r.event == event).count()
            + self
                .points()
                .filter(|p| p.venue == venue && p.event == event)
                .count()
    }

    /// Repoint runs and existing points from event `old` to `new`
    pub fn rename_event(&mut self, venue: &str, old: &str, new: &str) -> usize {
        let mut count = 0;
        for run in self.venue_runs_mut(venue).filter(|r| r.event == old) {
            run.event = new.to_string();
            count += 1;
        }
        for points in self.points_mut().filter(|p| p.venue == venue && p.event == old) {
            points.event = new.to_string();
            count += 1;
        }
        count
    }

    /// Remove runs and existing points naming `event`
    pub fn delete_event(&mut self, venue: &str, event: &str) -> usize {
        self.delete_runs(venue, |_, r| r.event == event)
            + self.delete_points(|p| p.venue == venue && p.event == event)
    }

    /// Existing multi-Q points recorded for `multi_q`
    #[must_use]
    pub fn count_multi_q(&self, venue: &str, multi_q: &str) -> usize {
        self.points().filter(|p| is_multi_q(p, venue, multi_q)).count()
    }

    /// Repoint existing multi-Q points
    pub fn rename_multi_q(&mut self, venue: &str, old: &str, new: &str) -> usize {
        let mut count = 0;
        for points in self.points_mut().filter(|p| is_multi_q(p, venue, old)) {
            points.multi_q = new.to_string();
            count += 1;
        }
        count
    }

    /// Remove existing multi-Q points
    pub fn delete_multi_q(&mut self, venue: &str, multi_q: &str) -> usize {
        self.delete_points(|p| is_multi_q(p, venue, multi_q))
    }

    /// Existing points and run entries naming other-points `name`
    #[must_use]
    pub fn count_other_points(&self, name: &str) -> usize {
        self.points().filter(|p| is_other(p, name)).count()
            + self
                .trials()
                .flat_map(|t| t.runs.iter())
                .flat_map(|r| r.other_points.iter())
                .filter(|o| o.name == name)
                .count()
    }

    /// Repoint other-points references
    pub fn rename_other_points(&mut self, old: &str, new: &str) -> usize {
        let mut count = 0;
        for points in self.points_mut().filter(|p| is_other(p, old)) {
            points.other = new.to_string();
            count += 1;
        }
        for dog in self.iter_mut() {
            for entry in dog
                .trials
                .iter_mut()
                .flat_map(|t| t.runs.iter_mut())
                .flat_map(|r| r.other_points.iter_mut())
                .filter(|o| o.name == old)
            {
                entry.name = new.to_string();
                count += 1;
            }
        }
        count
    }

    /// Remove other-points references; runs themselves stay
    pub fn delete_other_points(&mut self, name: &str) -> usize {
        let mut count = self.delete_points(|p| is_other(p, name));
        for run in self
            .iter_mut()
            .flat_map(|d| d.trials.iter_mut())
            .flat_map(|t| t.runs.iter_mut())
        {
            let before = run.other_points.len();
            run.other_points.retain(|o| o.name != name);
            count += before - run.other_points.len();
        }
        count
    }
}

fn is_multi_q(points: &ExistingPoints, venue: &str, multi_q: &str) -> bool {
    points.kind == PointsKind::MultiQ && points.venue == venue && points.multi_q == multi_q
}

fn is_other(points: &ExistingPoints, name: &str) -> bool {
    points.kind == PointsKind::Other && points.other == name
}

/// Distinct hosting venues that define `division`
fn venues_with_division(clubs: &[Club], config: &Configuration, division: &str) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    for club in clubs {
        let defines = config
            .venue(&club.venue)
            .is_some_and(|v| v.divisions.contains(division));
        if defines && !seen.contains(&club.venue.as_str()) {
            seen.push(&club.venue);
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dog::{Dog, DogTitle, RegNum};
    use crate::trial::RunOtherPoints;
    use arb_config::{Division, Venue};
    use arb_tree::ArbDate;

    fn run(division: &str, level: &str, event: &str) -> Run {
        Run::new(ArbDate::from_ymd(2020, 3, 1), division, level, event)
    }

    fn dogs() -> DogList {
        let mut dog = Dog::new("Tess")
            .with_trial(
                Trial::new(Club::new("Dog Club", "AKC"))
                    .with_run(run("Standard", "Novice", "JWW"))
                    .with_run(run("Standard", "Open", "JWW")),
            )
            .with_trial(Trial::new(Club::new("Other Club", "USDAA")).with_run(run("Standard", "Novice", "Jumpers")));
        dog.existing_points.push(
            ExistingPoints::new(PointsKind::Runs, "AKC", 10.0).with_class("Standard", "Novice", "JWW"),
        );
        dog.reg_nums.push(RegNum::new("AKC", "SR1"));
        dog.titles.push(DogTitle::new("AKC", "NA", None));
        DogList::from_iter([dog])
    }

    #[test]
    fn counts_only_inside_venue() {
        let dogs = dogs();
        assert_eq!(dogs.count_division("AKC", "Standard"), 3);
        assert_eq!(dogs.count_level("AKC", "Standard", "Novice"), 2);
        assert_eq!(dogs.count_event("USDAA", "Jumpers"), 1);
        assert_eq!(dogs.count_venue("AKC"), 4);
        assert_eq!(dogs.count_title("AKC", "NA"), 1);
    }

    #[test]
    fn rename_venue_repoints_clubs() {
        let mut dogs = dogs();
        assert_eq!(dogs.rename_venue("AKC", "AKC2"), 4);
        assert_eq!(dogs.count_venue("AKC"), 0);
        assert_eq!(dogs.count_venue("AKC2"), 4);
    }

    #[test]
    fn delete_event_drops_emptied_trials() {
        let mut dogs = dogs();
        assert_eq!(dogs.delete_event("AKC", "JWW"), 3);
        let tess = dogs.find("Tess").unwrap();
        assert_eq!(tess.trials.len(), 1);
        assert!(tess.existing_points.is_empty());
    }

    #[test]
    fn co_hosted_division_runs_survive_delete() {
        let mut config = Configuration::new();
        for name in ["AKC", "CPE"] {
            let mut venue = Venue::new(name);
            venue.divisions.add(Division::new("Standard")).unwrap();
            config.venues.add(venue).unwrap();
        }
        let mut trial = Trial::new(Club::new("A", "AKC")).with_run(run("Standard", "Novice", "JWW"));
        trial.clubs.push(Club::new("B", "CPE"));
        let mut dogs = DogList::from_iter([Dog::new("Tess").with_trial(trial)]);

        assert_eq!(dogs.delete_division(&config, "AKC", "Standard"), 0);
        config.venues.delete("CPE");
        assert_eq!(dogs.delete_division(&config, "AKC", "Standard"), 1);
        assert!(dogs.find("Tess").unwrap().trials.is_empty());
    }

    #[test]
    fn other_points_cascade_keeps_runs() {
        let mut dogs = dogs();
        for dog in dogs.iter_mut() {
            dog.trials[0].runs[0].other_points.push(RunOtherPoints {
                name: "Top Ten".into(),
                points: 2.0,
            });
        }
        assert_eq!(dogs.count_other_points("Top Ten"), 1);
        assert_eq!(dogs.rename_other_points("Top Ten", "Top 10"), 1);
        assert_eq!(dogs.delete_other_points("Top 10"), 1);
        assert_eq!(dogs.find("Tess").unwrap().trials[0].runs.len(), 2);
    }

    #[test]
    fn delete_venue_removes_clubless_trials() {
        let mut dogs = dogs();
        assert_eq!(dogs.delete_venue("AKC"), 4);
        let tess = dogs.find("Tess").unwrap();
        assert_eq!(tess.trials.len(), 1);
        assert!(tess.reg_nums.is_empty() && tess.titles.is_empty());
    }
}
