use super::domain::{SchemeCategory, SchemeDefinition, SchemeId};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Error raised while loading a scheme catalog export.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog row: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog row {row} has unknown category '{category}'")]
    UnknownCategory { row: usize, category: String },
}

#[derive(Debug, Deserialize)]
struct SchemeRow {
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Benefits", default)]
    benefits: String,
    #[serde(rename = "Category")]
    category: String,
}

/// Load scheme definitions from a CSV export of the catalog table.
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<SchemeDefinition>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut schemes = Vec::new();
    for (index, record) in csv_reader.deserialize::<SchemeRow>().enumerate() {
        let row = record?;
        let category = SchemeCategory::from_label(&row.category).ok_or_else(|| {
            CatalogError::UnknownCategory {
                row: index + 1,
                category: row.category.clone(),
            }
        })?;

        schemes.push(SchemeDefinition {
            id: SchemeId(row.id),
            name: row.name,
            description: row.description,
            benefits: row.benefits,
            category,
        });
    }

    Ok(schemes)
}

pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<SchemeDefinition>, CatalogError> {
    let file = std::fs::File::open(path)?;
    from_reader(file)
}

/// Built-in catalog used when no export is supplied.
pub fn default_catalog() -> Vec<SchemeDefinition> {
    vec![
        scheme(
            1,
            "PM-KISAN",
            "Income support of ₹6,000 per year to farmer families in three equal installments.",
            "Direct income support of ₹6,000 per year.",
            SchemeCategory::IncomeSupport,
        ),
        scheme(
            2,
            "Kisan Credit Card",
            "Affordable credit for agricultural needs and allied requirements.",
            "Short-term cultivation loans at favorable interest rates.",
            SchemeCategory::Credit,
        ),
        scheme(
            3,
            "Soil Health Card",
            "Assessment of soil health with nutrient and fertilizer recommendations.",
            "Soil nutrient status and recommendations for improvement.",
            SchemeCategory::TechnicalSupport,
        ),
        scheme(
            4,
            "Pradhan Mantri Fasal Bima Yojana",
            "Crop insurance against loss or damage from unforeseen events.",
            "Insurance coverage and financial support on crop failure.",
            SchemeCategory::Insurance,
        ),
        scheme(
            5,
            "National Mission for Sustainable Agriculture",
            "Climate adaptation, water-use efficiency, and soil health management.",
            "Technical and financial assistance for sustainable practices.",
            SchemeCategory::SustainableFarming,
        ),
        scheme(
            6,
            "Agriculture Infrastructure Fund",
            "Financing for post-harvest management infrastructure and community assets.",
            "Interest subvention and credit guarantee for infrastructure.",
            SchemeCategory::Infrastructure,
        ),
    ]
}

fn scheme(
    id: u32,
    name: &str,
    description: &str,
    benefits: &str,
    category: SchemeCategory,
) -> SchemeDefinition {
    SchemeDefinition {
        id: SchemeId(id),
        name: name.to_string(),
        description: description.to_string(),
        benefits: benefits.to_string(),
        category,
    }
}
