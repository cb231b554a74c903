use super::directory::GeoDirectory;
use super::error::GeoError;
use super::fake::FakeGeoDirectory;

#[tokio::test]
async fn sample_directory_lists_countries() {
    let directory = FakeGeoDirectory::with_sample_data();
    let countries = directory.countries().await.unwrap();
    assert_eq!(countries, vec!["Colombia", "Perú"]);
}

#[tokio::test]
async fn departments_are_scoped_to_their_country() {
    let directory = FakeGeoDirectory::with_sample_data();
    assert_eq!(
        directory.departments("Colombia").await.unwrap(),
        vec!["Antioquia", "Cundinamarca"]
    );
    assert_eq!(directory.departments("Perú").await.unwrap(), vec!["Lima"]);
}

#[tokio::test]
async fn cities_are_scoped_to_country_and_department() {
    let directory = FakeGeoDirectory::with_sample_data();
    assert_eq!(
        directory.cities("Colombia", "Cundinamarca").await.unwrap(),
        vec!["Bogotá", "Chía"]
    );
}

#[tokio::test]
async fn unknown_country_yields_empty_lists() {
    let directory = FakeGeoDirectory::with_sample_data();
    assert!(directory.departments("Atlantis").await.unwrap().is_empty());
    assert!(directory
        .cities("Atlantis", "Nowhere")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn failed_operation_surfaces_service_error() {
    let directory = FakeGeoDirectory::with_sample_data();
    directory.fail_operation("cities");

    let result = directory.cities("Colombia", "Cundinamarca").await;

    assert!(matches!(result, Err(GeoError::Service(_))));
}
