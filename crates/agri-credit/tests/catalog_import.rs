//! CSV catalog import behavior, driven through the public loader.

use agri_credit::workflows::credit::catalog::{self, CatalogError};
use agri_credit::workflows::credit::domain::{SchemeCategory, SchemeId};

const EXPORT: &str = "\
Id,Name,Description,Benefits,Category
1,PM-KISAN,Income support installments,Direct income support,Income Support
2,Kisan Credit Card,Affordable agricultural credit,Low-interest cultivation loans,Credit
9,District Cold Chain,Post-harvest cold storage,Storage subsidy,Infrastructure
";

#[test]
fn parses_a_well_formed_export() {
    let schemes = catalog::from_reader(EXPORT.as_bytes()).expect("valid export parses");

    assert_eq!(schemes.len(), 3);
    assert_eq!(schemes[0].id, SchemeId(1));
    assert_eq!(schemes[0].category, SchemeCategory::IncomeSupport);
    assert_eq!(schemes[2].name, "District Cold Chain");
    assert_eq!(schemes[2].category, SchemeCategory::Infrastructure);
}

#[test]
fn trims_padded_fields() {
    let padded = "\
Id,Name,Description,Benefits,Category
7,  Drip Irrigation Grant  ,  Micro-irrigation support  ,  Equipment subsidy  ,  Sustainable Farming
";
    let schemes = catalog::from_reader(padded.as_bytes()).expect("padded export parses");

    assert_eq!(schemes[0].name, "Drip Irrigation Grant");
    assert_eq!(schemes[0].category, SchemeCategory::SustainableFarming);
}

#[test]
fn rejects_unknown_category_with_row_position() {
    let bad = "\
Id,Name,Description,Benefits,Category
1,PM-KISAN,Income support,Direct support,Income Support
2,Mystery Scheme,Unclear,Unclear,Quantum Farming
";
    let err = catalog::from_reader(bad.as_bytes()).expect_err("unknown category fails");

    match err {
        CatalogError::UnknownCategory { row, category } => {
            assert_eq!(row, 2);
            assert_eq!(category, "Quantum Farming");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_non_numeric_scheme_id() {
    let bad = "\
Id,Name,Description,Benefits,Category
abc,Broken Row,Bad id,None,Credit
";
    assert!(matches!(
        catalog::from_reader(bad.as_bytes()),
        Err(CatalogError::Csv(_))
    ));
}

#[test]
fn default_catalog_covers_the_standard_programs() {
    let schemes = catalog::default_catalog();

    assert_eq!(schemes.len(), 6);
    let ids: Vec<u32> = schemes.iter().map(|scheme| scheme.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert!(schemes
        .iter()
        .any(|scheme| scheme.category == SchemeCategory::Credit));
}
