//! Fixed messages sent outside of dialogs

pub const GREETINGS: &str =
    "Hi! I can look up parts, quote them for you and tell you how to reach the shop.";

pub const HELP: &str = "Try asking me for a part by its id, say \"start search\", \
ask for the shop's contact info or say \"login\" to sign in.";

pub const NONE: &str = "Sorry, I didn't get that. Type \"help\" to see what I can do.";

pub const SEARCHING: &str = "Searching...";

pub const SOMETHING_WENT_WRONG: &str = "Sorry, it looks like something went wrong.";

pub const COULD_NOT_LOG_IN: &str = "Could not log in";

pub const MISSING_PART_ID: &str = "Which part are you looking for? Please include its id.";
