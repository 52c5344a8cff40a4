use approx::assert_relative_eq;
use energy_data::{
    read_emissions, read_energy, DataError, DatasetFetcher, DatasetLoader, DatasetSource, Measure,
    PivotTable,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const ENERGY_CSV: &str = "\
country,year,iso_code,coal_consumption,gas_consumption,renewables_consumption,oil_consumption
Canada,2000,CAN,400.0,900.0,3500.0,1200.0
United States,2000,USA,6500.0,6200.0,1800.0,11000.0
United States,2001,USA,6300.0,6000.0,1600.0,11100.0
United States,2002,USA,6350.0,,1750.0,11200.0
United States,2003,USA,6420.0,6150.0,1900.0,11300.0
United States,2004,USA,6450.0,6250.0,1950.0,11400.0
";

const CO2_CSV: &str = "\
country,year,co2,coal_co2,gas_co2,oil_co2
Canada,2000,560.0,120.0,150.0,290.0
United States,2000,6000.0,2200.0,1250.0,2550.0
United States,2001,5900.0,2100.0,1230.0,2570.0
United States,2002,5950.0,2150.0,1240.0,2560.0
United States,2003,5990.0,2160.0,1200.0,2630.0
";

fn fixtures() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let energy = dir.path().join("owid-energy-data.csv");
    let co2 = dir.path().join("owid-co2-data.csv");
    fs::write(&energy, ENERGY_CSV).unwrap();
    fs::write(&co2, CO2_CSV).unwrap();
    (dir, energy, co2)
}

fn load(energy: &Path, co2: &Path) -> energy_data::Result<energy_data::EnergyDataset> {
    DatasetLoader::new("United States", DatasetFetcher::default())
        .load(&DatasetSource::path(energy), &DatasetSource::path(co2))
}

#[test]
fn test_read_energy_filters_country() {
    let (_dir, energy, _) = fixtures();
    let frame = read_energy(&energy, "United States").unwrap();
    assert_eq!(frame.len(), 5);
    assert_eq!(frame.row(2002).unwrap()[1], None);
    assert_eq!(frame.row(2000).unwrap()[0], Some(6500.0));
}

#[test]
fn test_read_emissions_skips_absent_columns() {
    let (_dir, _, co2) = fixtures();
    let frame = read_emissions(&co2, "United States").unwrap();
    // other_industry_co2 is absent from the fixture
    assert_eq!(
        frame.measures(),
        &[Measure::CoalCo2, Measure::GasCo2, Measure::TotalCo2]
    );
}

#[test]
fn test_load_merges_and_derives() {
    let (_dir, energy, co2) = fixtures();
    let data = load(&energy, &co2).unwrap();

    // 2002 has no gas value, 2004 has no CO₂ row
    assert_eq!(data.pivot.years(), vec![2000, 2001, 2003]);
    assert_relative_eq!(
        data.pivot.value(2000, Measure::TotalElectricity).unwrap(),
        14500.0
    );
    assert_relative_eq!(
        data.pivot.value(2000, Measure::EmissionsIntensity).unwrap(),
        6000.0 / 14500.0
    );
    assert_eq!(data.merged.country(), "United States");
}

#[test]
fn test_persist_and_reload_pivot() {
    let (dir, energy, co2) = fixtures();
    let data = load(&energy, &co2).unwrap();

    let merged_path = dir.path().join("out/us_energy_co2_merged.csv");
    let pivot_path = dir.path().join("out/us_energy_co2_pivot.csv");
    data.persist(&merged_path, &pivot_path).unwrap();

    let merged = fs::read_to_string(&merged_path).unwrap();
    let header = merged.lines().next().unwrap();
    assert_eq!(
        header,
        "country,Year,Coal (TWh),Gas (TWh),Renewables (TWh),Coal CO₂ (Mt),Gas CO₂ (Mt),Total CO₂ (Mt)"
    );

    let pivot = fs::read_to_string(&pivot_path).unwrap();
    assert!(pivot
        .lines()
        .next()
        .unwrap()
        .ends_with("Total Electricity (TWh),Emissions_Intensity (Mt/TWh)"));

    let reloaded = PivotTable::from_csv(&pivot_path).unwrap();
    assert_eq!(reloaded.measures(), data.pivot.measures());
    assert_eq!(reloaded.years(), data.pivot.years());
    assert_relative_eq!(
        reloaded.latest(Measure::Gas).unwrap(),
        data.pivot.latest(Measure::Gas).unwrap()
    );
}

#[rstest]
#[case("coal_consumption")]
#[case("gas_consumption")]
#[case("renewables_consumption")]
fn test_missing_required_column(#[case] missing: &str) {
    let columns: Vec<&str> = ["coal_consumption", "gas_consumption", "renewables_consumption"]
        .into_iter()
        .filter(|c| *c != missing)
        .collect();
    let dir = tempdir().unwrap();
    let energy = dir.path().join("energy.csv");
    fs::write(
        &energy,
        format!(
            "country,year,{}\nUnited States,2000,1.0,2.0\n",
            columns.join(",")
        ),
    )
    .unwrap();

    let err = read_energy(&energy, "United States").unwrap_err();
    assert!(matches!(err, DataError::MissingColumn(ref c) if c.contains(missing)));
}

#[rstest]
#[case("coal_co2", Measure::CoalCo2)]
#[case("gas_co2", Measure::GasCo2)]
#[case("other_industry_co2", Measure::OtherCo2)]
#[case("co2", Measure::TotalCo2)]
fn test_read_emissions_without_optional_column(#[case] absent: &str, #[case] measure: Measure) {
    let columns: Vec<&str> = ["coal_co2", "gas_co2", "other_industry_co2", "co2"]
        .into_iter()
        .filter(|c| *c != absent)
        .collect();
    let dir = tempdir().unwrap();
    let co2 = dir.path().join("co2.csv");
    fs::write(
        &co2,
        format!(
            "country,year,{}\nUnited States,2000,1.0,2.0,3.0\n",
            columns.join(",")
        ),
    )
    .unwrap();

    let frame = read_emissions(&co2, "United States").unwrap();
    assert_eq!(frame.measures().len(), 3);
    assert!(!frame.measures().contains(&measure));
    assert_eq!(frame.row(2000).unwrap(), &[Some(1.0), Some(2.0), Some(3.0)]);
}

#[test]
fn test_unknown_country_is_empty() {
    let (_dir, energy, co2) = fixtures();
    let err = DatasetLoader::new("Atlantis", DatasetFetcher::default())
        .load(&DatasetSource::path(&energy), &DatasetSource::path(&co2))
        .unwrap_err();
    assert!(matches!(err, DataError::Empty(_)));
}

#[test]
fn test_missing_dataset_file() {
    let (dir, energy, _) = fixtures();
    let err = load(&energy, &dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, DataError::DataLoad(_)));
}
