//! Element and attribute names of the record-book document

/// Element names
pub mod element {
    pub const BOOK: &str = "AgilityBook";
    pub const DOG: &str = "Dog";
    pub const REG_NAME: &str = "RegisteredName";
    pub const BREED: &str = "Breed";
    pub const NOTE: &str = "Note";
    pub const EXISTING_POINTS: &str = "ExistingPoints";
    pub const REG_NUM: &str = "RegNum";
    pub const TITLE: &str = "Title";
    pub const TRIAL: &str = "Trial";
    pub const LOCATION: &str = "Location";
    pub const CLUB: &str = "Club";
    pub const RUN: &str = "Run";
    pub const CONDITIONS: &str = "Conditions";
    pub const JUDGE: &str = "Judge";
    pub const HANDLER: &str = "Handler";
    pub const PARTNER: &str = "Partner";
    pub const BY_TIME: &str = "ByTime";
    pub const BY_OPEN_CLOSE: &str = "ByOpenClose";
    pub const BY_POINTS: &str = "ByPoints";
    pub const PLACEMENT: &str = "Placement";
    pub const RUN_OTHER_POINTS: &str = "OtherPoints";
}

/// Attribute names
pub mod attr {
    pub const BOOK_VERSION: &str = "Book";

    pub const DOG_CALL_NAME: &str = "CallName";
    pub const DOG_DOB: &str = "DOB";
    pub const DOG_DECEASED: &str = "Deceased";

    pub const EXISTING_DATE: &str = "Date";
    pub const EXISTING_TYPE: &str = "Type";
    pub const EXISTING_OTHER: &str = "Other";
    pub const EXISTING_VENUE: &str = "Venue";
    pub const EXISTING_MULTIQ: &str = "MultiQ";
    pub const EXISTING_DIVISION: &str = "Div";
    pub const EXISTING_LEVEL: &str = "Level";
    pub const EXISTING_EVENT: &str = "Event";
    pub const EXISTING_SUBNAME: &str = "SubName";
    pub const EXISTING_POINTS: &str = "Pts";

    pub const REG_NUM_VENUE: &str = "Venue";
    pub const REG_NUM_NUMBER: &str = "Number";
    pub const REG_NUM_HEIGHT: &str = "Height";
    pub const REG_NUM_RECEIVED: &str = "isReceived";

    pub const TITLE_VENUE: &str = "Venue";
    pub const TITLE_NAME: &str = "Name";
    pub const TITLE_DATE: &str = "Date";
    pub const TITLE_RECEIVED: &str = "isReceived";

    pub const TRIAL_VERIFIED: &str = "Verified";
    pub const CLUB_VENUE: &str = "Venue";

    pub const RUN_DATE: &str = "Date";
    pub const RUN_DIVISION: &str = "Division";
    pub const RUN_LEVEL: &str = "Level";
    pub const RUN_HEIGHT: &str = "Height";
    pub const RUN_EVENT: &str = "Event";
    pub const RUN_SUBNAME: &str = "SubName";

    pub const SCORING_FAULTS: &str = "CourseFaults";
    pub const SCORING_TIME: &str = "Time";
    pub const SCORING_HAS_TABLE: &str = "hasTable";
    pub const SCORING_SCT: &str = "SCT";
    pub const SCORING_SCT2: &str = "SCT2";
    pub const SCORING_YARDS: &str = "Yards";
    pub const SCORING_BONUS: &str = "bonusPts";
    pub const NEED_OPEN: &str = "NeedOpenPts";
    pub const NEED_CLOSE: &str = "NeedClosePts";
    pub const GOT_OPEN: &str = "OpenPts";
    pub const GOT_CLOSE: &str = "ClosePts";
    pub const NEED_POINTS: &str = "NeedPts";
    pub const GOT_POINTS: &str = "Points";

    pub const PLACEMENT_Q: &str = "Q";
    pub const PLACEMENT_PLACE: &str = "Place";
    pub const PLACEMENT_IN_CLASS: &str = "InClass";
    pub const PLACEMENT_DOGS_QD: &str = "DogsQd";
    pub const OTHER_POINTS_NAME: &str = "Name";
    pub const OTHER_POINTS_POINTS: &str = "Points";
}
