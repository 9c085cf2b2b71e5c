//! Queries against the live JPL/Horizons service; run with `cargo test -- --ignored`.
use k2ephem::{
    check_target, fetch_and_check, CampaignCatalog, CheckParams, HorizonsEnv, K2EphemError,
};

fn visible_campaigns(target: &str, last: u32) -> Result<Vec<u32>, K2EphemError> {
    let env = HorizonsEnv::new()?;
    let catalog = CampaignCatalog::k2();
    let params = CheckParams::builder()
        .first_campaign(0)
        .last_campaign(last)
        .step_size_days(1.0)
        .build()?;
    Ok(check_target(&env, &catalog, target, &params)?
        .iter()
        .map(|r| r.campaign)
        .collect())
}

#[test]
#[ignore]
fn test_pluto_only_in_c7() {
    assert_eq!(visible_campaigns("999", 13).unwrap(), vec![7]);
}

#[test]
#[ignore]
fn test_unknown_target_is_an_ephem_failure() {
    let err = visible_campaigns("not-a-real-body-xyz", 13).unwrap_err();
    assert!(err.is_ephem_failure());
}

#[test]
#[ignore]
fn test_earth_in_c9_and_c17() {
    assert_eq!(visible_campaigns("399", 19).unwrap(), vec![9, 17]);
}

#[test]
#[ignore]
fn test_fetch_and_check_keeps_the_ephemeris() {
    let env = HorizonsEnv::new().unwrap();
    let catalog = CampaignCatalog::k2();
    let params = CheckParams::builder()
        .first_campaign(7)
        .last_campaign(7)
        .build()
        .unwrap();
    let (table, results) = fetch_and_check(&env, &catalog, "999", &params).unwrap();
    let window = catalog.get(7).unwrap().window;
    assert!(!table.slice(&window).is_empty());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].summary.n_samples, table.slice(&window).len());
}
