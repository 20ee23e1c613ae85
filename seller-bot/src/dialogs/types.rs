pub mod dialog_ids {
    pub const SEARCH: &str = "search";
    pub const LOGIN: &str = "login";
    pub const QUOTE_CONFIRMATION: &str = "quote-confirmation";
}

/// Keys into a dialog's collected values and the session's extracted parameters
pub mod session_keys {
    pub const PIECE: &str = "piece";
    pub const KEYWORD: &str = "keyword";
    pub const USER: &str = "user";
    pub const PART_NUMBER: &str = "partNumber";
}
