// These talk to the real listing service and are skipped by default:
//
//     cargo test -- --ignored
//
// A known bug is printed and tolerated; anything else that goes wrong fails the test.

use listing_api_check::{
    cases::{self, Case, Outcome},
    request::{ListingClient, DEFAULT_BASE_URL},
};

fn run_matching<F>(select: F)
where
    F: Fn(&Case) -> bool,
{
    let client = ListingClient::new(DEFAULT_BASE_URL);
    let mut failures = vec![];

    for case in cases::all_cases().iter().filter(|case| select(case)) {
        match case.run(&client) {
            Outcome::Passed => println!("PASS  {}", case.name()),
            Outcome::KnownBug { bug, detail } => {
                println!("XFAIL {} ({}: {})", case.name(), bug, detail)
            }
            Outcome::Failed(detail) => failures.push(format!("{}: {}", case.name(), detail)),
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
#[ignore]
fn create_item_valid_test() {
    run_matching(|case| matches!(case, Case::CreateItemValid { .. }));
}

#[test]
#[ignore]
fn create_item_missing_fields_test() {
    run_matching(|case| matches!(case, Case::CreateItemMissingField(_)));
}

#[test]
#[ignore]
fn create_item_invalid_seller_id_test() {
    run_matching(|case| matches!(case, Case::CreateItemInvalidSellerId(_)));
}

#[test]
#[ignore]
fn create_item_empty_body_test() {
    run_matching(|case| *case == Case::CreateItemEmptyBody);
}

#[test]
#[ignore]
fn get_item_invalid_id_test() {
    run_matching(|case| matches!(case, Case::GetItemInvalidId(_)));
}

#[test]
#[ignore]
fn get_statistic_valid_test() {
    run_matching(|case| *case == Case::GetStatisticValid);
}

#[test]
#[ignore]
fn get_items_by_seller_valid_test() {
    run_matching(|case| *case == Case::GetItemsBySellerValid);
}
