//! Element and attribute names of the document format

/// Element names
pub mod element {
    pub const CONFIG: &str = "Configuration";
    pub const ACTION: &str = "Action";
    pub const VENUE: &str = "Venue";
    pub const DESC: &str = "Desc";
    pub const TITLES: &str = "Titles";
    pub const MULTIQ: &str = "MultiQ";
    pub const MULTIQ_ITEM: &str = "MultiQItem";
    pub const DIVISION: &str = "Division";
    pub const LEVEL: &str = "Level";
    pub const SUBLEVEL: &str = "SubLevel";
    pub const EVENT: &str = "Event";
    pub const SUBNAME: &str = "SubName";
    pub const SCORING: &str = "Scoring";
    pub const NOTE: &str = "Note";
    pub const PLACE_INFO: &str = "PlaceInfo";
    pub const TITLE_POINTS: &str = "TitlePoints";
    pub const LIFETIME_POINTS: &str = "LifeTime";
    pub const PLACEMENTS: &str = "Placements";
    pub const FAULT_TYPE: &str = "FaultType";
    pub const OTHER_POINTS: &str = "OtherPts";
}

/// Attribute names
pub mod attr {
    pub const NAME: &str = "Name";
    pub const CONFIG_VERSION: &str = "version";

    pub const ACTION_VERB: &str = "Verb";
    pub const ACTION_CONFIG: &str = "config";
    pub const ACTION_VENUE: &str = "Venue";
    pub const ACTION_DIVISION: &str = "Div";
    pub const ACTION_LEVEL: &str = "Level";
    pub const ACTION_OLD_NAME: &str = "OldName";
    pub const ACTION_NEW_NAME: &str = "NewName";

    pub const VENUE_LONG_NAME: &str = "LongName";
    pub const VENUE_URL: &str = "URL";
    pub const VENUE_POINTS_TYPE: &str = "PointsType";

    pub const TITLE_LONG_NAME: &str = "LongName";
    pub const TITLE_MULTIPLE: &str = "Multiple";
    pub const TITLE_PREFIX: &str = "Prefix";

    pub const VALID_FROM: &str = "ValidFrom";
    pub const VALID_TO: &str = "ValidTo";

    pub const EVENT_HAS_TABLE: &str = "hasTable";
    pub const EVENT_HAS_PARTNER: &str = "hasPartner";
    pub const EVENT_HAS_SUBNAMES: &str = "hasSubNames";

    pub const SCORING_DIVISION: &str = "Division";
    pub const SCORING_LEVEL: &str = "Level";
    pub const SCORING_TYPE: &str = "type";
    pub const SCORING_DROP_FRACTIONS: &str = "dropFractions";
    pub const SCORING_CLEAN_Q: &str = "cleanQ";
    pub const SCORING_TF_UNDER: &str = "underTF";
    pub const SCORING_TF_OVER: &str = "overTF";
    pub const SCORING_SUBTRACT_TF: &str = "subtractTF";
    pub const SCORING_TF_MULTIPLIER: &str = "timeFault";
    pub const SCORING_OPENING_PTS: &str = "OpeningPts";
    pub const SCORING_CLOSING_PTS: &str = "ClosingPts";
    pub const SCORING_SUPER_Q: &str = "superQ";
    pub const SCORING_SPEED_PTS: &str = "speedPts";
    pub const SCORING_BONUS_PTS: &str = "bonusPts";

    pub const PLACE_INFO_PLACE: &str = "Place";
    pub const PLACE_INFO_VALUE: &str = "Value";
    pub const PLACE_INFO_MUST_Q: &str = "MustQ";

    pub const POINTS: &str = "Points";
    pub const FAULTS: &str = "Faults";

    pub const MULTIQ_SHORT_NAME: &str = "SName";
    pub const MULTIQ_ITEM_DIVISION: &str = "Div";
    pub const MULTIQ_ITEM_LEVEL: &str = "Level";
    pub const MULTIQ_ITEM_EVENT: &str = "Event";

    pub const OTHER_POINTS_COUNT: &str = "Count";
    pub const OTHER_POINTS_DEFAULT: &str = "defValue";
}
