use reqwest::StatusCode;
use serde_json::{json, Value};
use strum::IntoEnumIterator;

use std::collections::HashSet;
use std::error::Error;

use crate::api::{
    self, Created, Field, ItemId, Listing, ListingRecord, Statistics, StatisticsRecord,
};
use crate::bugs::KnownBug;
use crate::request::ListingClient;

const SELLER_ID: i64 = 12416;

macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err(format!($($arg)+).into());
        }
    };
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Passed,
    /// Failed in a way that matches an already reported server defect.
    KnownBug { bug: KnownBug, detail: String },
    Failed(String),
}

impl Outcome {
    fn known_bug(bug: KnownBug, detail: impl Into<String>) -> Self {
        Outcome::KnownBug {
            bug,
            detail: detail.into(),
        }
    }

    /// A known bug that has since been marked fixed counts as a regression.
    pub fn settle(self, fixed_bugs: &HashSet<KnownBug>) -> Self {
        match self {
            Outcome::KnownBug { bug, detail } if fixed_bugs.contains(&bug) => {
                Outcome::Failed(format!("regression of {}: {}", bug, detail))
            }
            outcome => outcome,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Case {
    CreateItemValid { seller_id: i64 },
    CreateItemMissingField(Field),
    CreateItemInvalidSellerId(Value),
    CreateItemEmptyBody,
    GetItemInvalidId(ItemId),
    GetStatisticValid,
    GetItemsBySellerValid,
}

/// Every case in the order they are run.
pub fn all_cases() -> Vec<Case> {
    let mut cases = vec![];

    for seller_id in &[12416, 999999, 111111] {
        cases.push(Case::CreateItemValid {
            seller_id: *seller_id,
        });
    }
    for field in Field::iter() {
        cases.push(Case::CreateItemMissingField(field));
    }
    for seller_id in vec![json!(-1), json!("abc123"), json!(999999999999999_i64)] {
        cases.push(Case::CreateItemInvalidSellerId(seller_id));
    }
    cases.push(Case::CreateItemEmptyBody);
    for item_id in vec![
        ItemId::Number(1234567890),
        ItemId::Text("1234567890".to_string()),
        ItemId::Absent,
        ItemId::Text("".to_string()),
        ItemId::Text("      ".to_string()),
    ] {
        cases.push(Case::GetItemInvalidId(item_id));
    }
    cases.push(Case::GetStatisticValid);
    cases.push(Case::GetItemsBySellerValid);

    cases
}

impl Case {
    pub fn name(&self) -> String {
        match self {
            Case::CreateItemValid { seller_id } => format!("test_create_item_valid[{}]", seller_id),
            Case::CreateItemMissingField(field) => {
                format!("test_create_item_missing_fields[{}]", field)
            }
            Case::CreateItemInvalidSellerId(seller_id) => format!(
                "test_create_item_invalid_sellerId[{}]",
                seller_id
                    .as_str()
                    .map_or_else(|| seller_id.to_string(), |s| s.to_string())
            ),
            Case::CreateItemEmptyBody => "test_create_item_empty_body".to_string(),
            Case::GetItemInvalidId(item_id) => {
                let label = match item_id {
                    ItemId::Number(n) => n.to_string(),
                    ItemId::Text(s) => format!("{:?}", s),
                    ItemId::Absent => "absent".to_string(),
                };
                format!("test_get_item_invalid_id[{}]", label)
            }
            Case::GetStatisticValid => "test_get_statistic_valid".to_string(),
            Case::GetItemsBySellerValid => "test_get_items_by_seller_valid".to_string(),
        }
    }

    /// The defect this case is allowed to run into.
    pub fn known_bug(&self) -> KnownBug {
        match self {
            Case::CreateItemValid { .. } => KnownBug::NameMismatch,
            Case::CreateItemMissingField(_) => KnownBug::MissingFieldAccepted,
            Case::CreateItemInvalidSellerId(_) => KnownBug::InvalidSellerIdAccepted,
            Case::CreateItemEmptyBody => KnownBug::EmptyBodyAccepted,
            Case::GetItemInvalidId(_) => KnownBug::InvalidIdNotFound,
            Case::GetStatisticValid => KnownBug::LikesMismatch,
            Case::GetItemsBySellerValid => KnownBug::SellerItemsNotArray,
        }
    }

    /// Transport errors, undecodable bodies and violated assertions all end up as `Failed`.
    pub fn run(&self, client: &ListingClient) -> Outcome {
        match self.check(client) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    fn check(&self, client: &ListingClient) -> Result<Outcome, Box<dyn Error>> {
        match self {
            Case::CreateItemValid { seller_id } => create_item_valid(client, *seller_id),
            Case::CreateItemMissingField(field) => {
                let payload = Listing::sample(SELLER_ID).payload_without(*field);
                let response = client.create_item(&payload)?;
                check_rejected(
                    response.status(),
                    self.known_bug(),
                    format!("API returns 200 OK when '{}' is missing", field),
                )
            }
            Case::CreateItemInvalidSellerId(seller_id) => {
                let payload = Listing::sample(SELLER_ID).payload_with_seller_id(seller_id.clone());
                let response = client.create_item(&payload)?;
                check_rejected(
                    response.status(),
                    self.known_bug(),
                    format!("API returns 200 OK for sellerId {}", seller_id),
                )
            }
            Case::CreateItemEmptyBody => {
                let response = client.create_item(&json!({}))?;
                check_rejected(
                    response.status(),
                    self.known_bug(),
                    "API returns 200 OK when body is empty",
                )
            }
            Case::GetItemInvalidId(item_id) => {
                let response = client.get_item(item_id)?;
                check_invalid_id_status(response.status(), item_id)
            }
            Case::GetStatisticValid => get_statistic_valid(client),
            Case::GetItemsBySellerValid => get_items_by_seller_valid(client),
        }
    }
}

fn create_item_valid(client: &ListingClient, seller_id: i64) -> Result<Outcome, Box<dyn Error>> {
    let listing = Listing::sample(seller_id);
    let item_id = create_listing(client, &listing)?;

    let response = client.get_item(&item_id)?;
    expect_status(response.status(), StatusCode::OK, "GET item")?;
    let body: Value = response.json()?;

    check_round_trip(&listing, api::first_record(&body)?)
}

fn get_statistic_valid(client: &ListingClient) -> Result<Outcome, Box<dyn Error>> {
    let listing = Listing::sample(SELLER_ID);
    let body = post_listing(client, &listing)?;
    let item_id = statistic_item_id(&body)?;

    let response = client.get_statistic(&item_id)?;
    expect_status(response.status(), StatusCode::OK, "GET statistic")?;
    let body: Value = response.json()?;

    check_statistic(&listing.statistics, api::first_record(&body)?)
}

fn get_items_by_seller_valid(client: &ListingClient) -> Result<Outcome, Box<dyn Error>> {
    let listing = Listing::sample(SELLER_ID);
    create_listing(client, &listing)?;

    let response = client.get_items_by_seller(listing.seller_id)?;
    expect_status(response.status(), StatusCode::OK, "GET seller items")?;
    let body: Value = response.json()?;

    check_seller_items(&body)
}

fn create_listing(client: &ListingClient, listing: &Listing) -> Result<String, Box<dyn Error>> {
    created_item_id(&post_listing(client, listing)?)
}

fn post_listing(client: &ListingClient, listing: &Listing) -> Result<Value, Box<dyn Error>> {
    let response = client.create_item(&listing.payload())?;
    expect_status(response.status(), StatusCode::OK, "POST item")?;
    Ok(response.json()?)
}

pub fn expect_status(
    actual: StatusCode,
    expected: StatusCode,
    what: &str,
) -> Result<(), Box<dyn Error>> {
    ensure!(actual == expected, "{} expected {}, got {}", what, expected, actual);
    Ok(())
}

/// Pulls the new listing's id out of a creation acknowledgement.
pub fn created_item_id(body: &Value) -> Result<String, Box<dyn Error>> {
    ensure!(
        body.get("status").is_some(),
        "Response does not contain 'status' field"
    );
    let created: Created = api::decode(body)?;
    Ok(created.item_id()?.to_string())
}

pub fn statistic_item_id(body: &Value) -> Result<String, Box<dyn Error>> {
    created_item_id(body)
        .map_err(|e| format!("Unable to extract item id from response ({})", e).into())
}

/// Creation requests that should have been refused: acceptance is the known defect,
/// anything other than 400 is a failure.
pub fn check_rejected(
    status: StatusCode,
    bug: KnownBug,
    detail: impl Into<String>,
) -> Result<Outcome, Box<dyn Error>> {
    if status == StatusCode::OK {
        return Ok(Outcome::known_bug(bug, detail));
    }
    expect_status(status, StatusCode::BAD_REQUEST, "POST item")?;
    Ok(Outcome::Passed)
}

pub fn check_invalid_id_status(
    status: StatusCode,
    item_id: &ItemId,
) -> Result<Outcome, Box<dyn Error>> {
    if status == StatusCode::NOT_FOUND {
        return Ok(Outcome::known_bug(
            KnownBug::InvalidIdNotFound,
            format!("API returns 404 for malformed id '{}'", item_id),
        ));
    }
    ensure!(
        status == StatusCode::BAD_REQUEST,
        "Expected 400 Bad Request for invalid id '{}', got {}",
        item_id,
        status
    );
    Ok(Outcome::Passed)
}

pub fn check_round_trip(sent: &Listing, record: &Value) -> Result<Outcome, Box<dyn Error>> {
    // name is compared before decoding, the defect may also change its type
    let name = record.get("name");
    if name != Some(&Value::String(sent.name.clone())) {
        return Ok(Outcome::known_bug(
            KnownBug::NameMismatch,
            format!(
                "'name' field is {}, expected '{}'",
                name.map_or_else(|| "missing".to_string(), |n| n.to_string()),
                sent.name
            ),
        ));
    }

    let fetched: ListingRecord = api::decode(record)?;
    ensure!(
        api::number_eq(&fetched.seller_id, sent.seller_id),
        "sellerId mismatch: {} != {}",
        fetched.seller_id,
        sent.seller_id
    );
    ensure!(
        api::number_eq(&fetched.price, sent.price),
        "price mismatch: {} != {}",
        fetched.price,
        sent.price
    );
    compare_statistics(&fetched.statistics, &sent.statistics)?;

    Ok(Outcome::Passed)
}

pub fn check_statistic(sent: &Statistics, record: &Value) -> Result<Outcome, Box<dyn Error>> {
    let likes = record.get("likes");
    if !api::value_eq(likes, sent.likes) {
        return Ok(Outcome::known_bug(
            KnownBug::LikesMismatch,
            format!(
                "'likes' value is {}, expected {}",
                likes.map_or_else(|| "missing".to_string(), |l| l.to_string()),
                sent.likes
            ),
        ));
    }

    let fetched: StatisticsRecord = api::decode(record)?;
    compare_statistics(&fetched, sent)?;

    Ok(Outcome::Passed)
}

pub fn check_seller_items(body: &Value) -> Result<Outcome, Box<dyn Error>> {
    match body {
        Value::Object(_) => Ok(Outcome::known_bug(
            KnownBug::SellerItemsNotArray,
            "response format for seller items is an object",
        )),
        Value::Array(items) => {
            ensure!(
                !items.is_empty(),
                "Expected at least one item in seller's items list"
            );
            Ok(Outcome::Passed)
        }
        other => Err(format!("Expected an array of items, got {}", api::shape(other)).into()),
    }
}

fn compare_statistics(
    fetched: &StatisticsRecord,
    sent: &Statistics,
) -> Result<(), Box<dyn Error>> {
    ensure!(
        api::number_eq(&fetched.contacts, sent.contacts),
        "contacts mismatch: {} != {}",
        fetched.contacts,
        sent.contacts
    );
    ensure!(
        api::number_eq(&fetched.likes, sent.likes),
        "likes mismatch: {} != {}",
        fetched.likes,
        sent.likes
    );
    ensure!(
        api::number_eq(&fetched.view_count, sent.view_count),
        "viewCount mismatch: {} != {}",
        fetched.view_count,
        sent.view_count
    );
    Ok(())
}
