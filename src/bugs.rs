use strum::{Display, EnumIter, EnumString, EnumVariantNames};

use std::str::FromStr;

/// Server defects that have been reported upstream. A case that runs into one of these
/// reports it as an expected failure instead of a regression.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumVariantNames, EnumIter,
)]
pub enum KnownBug {
    #[strum(serialize = "API_BUG_001")]
    NameMismatch,
    #[strum(serialize = "API_BUG_002")]
    MissingFieldAccepted,
    #[strum(serialize = "API_BUG_003")]
    EmptyBodyAccepted,
    #[strum(serialize = "API_BUG_004")]
    InvalidSellerIdAccepted,
    #[strum(serialize = "API_BUG_005")]
    InvalidIdNotFound,
    #[strum(serialize = "API_BUG_006")]
    LikesMismatch,
    #[strum(serialize = "API_BUG_007")]
    SellerItemsNotArray,
}

impl KnownBug {
    pub fn description(&self) -> &'static str {
        match self {
            KnownBug::NameMismatch => "created listing comes back with a different 'name'",
            KnownBug::MissingFieldAccepted => "listing missing a required field is accepted",
            KnownBug::EmptyBodyAccepted => "empty creation body is accepted",
            KnownBug::InvalidSellerIdAccepted => "invalid 'sellerId' is accepted",
            KnownBug::InvalidIdNotFound => "malformed listing id answers 404 instead of 400",
            KnownBug::LikesMismatch => "statistics 'likes' differs from the created listing",
            KnownBug::SellerItemsNotArray => {
                "seller listings come back as an object instead of an array"
            }
        }
    }
}

pub fn parse_bug<KnownBug: FromStr + strum::VariantNames>(
    code: &str,
) -> Result<KnownBug, Box<dyn std::error::Error>> {
    KnownBug::from_str(code.trim()).map_err(|_| {
        format!(
            "Invalid bug code: {} (valid values are {})",
            code,
            KnownBug::VARIANTS.join(", ")
        )
        .into()
    })
}
