use serde::{Deserialize, Serialize};

/// openFDA fields that are sometimes a bare string and sometimes an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(vs) => vs,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FdaResponse {
    #[serde(default)]
    pub results: Vec<FdaApplication>,
}

#[derive(Debug, Deserialize)]
pub struct FdaApplication {
    pub sponsor_name: Option<String>,
    pub application_number: Option<String>,
    #[serde(default)]
    pub products: Vec<FdaProduct>,
}

#[derive(Debug, Deserialize)]
pub struct FdaProduct {
    pub brand_name: Option<String>,
    pub generic_name: Option<String>,
    pub product_ndc: Option<OneOrMany<String>>,
    pub route: Option<OneOrMany<String>>,
    pub dosage_form: Option<String>,
    #[serde(default)]
    pub active_ingredients: Vec<FdaActiveIngredient>,
}

#[derive(Debug, Deserialize)]
pub struct FdaActiveIngredient {
    pub name: Option<String>,
    pub strength: Option<String>,
}

/// Flat product record returned to the client.
#[derive(Debug, Serialize)]
pub struct MedicationResult {
    pub name: String,
    pub prescribable_name: Option<String>,
    pub rx_norm_prescribable_name: Option<String>,
    pub ndc_product_codes: Vec<String>,
    pub other_local_product_ids: Vec<String>,
    pub route: Vec<String>,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
    pub manufacturer_name: Option<String>,
    pub application_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub total: usize,
    pub results: Vec<MedicationResult>,
}

/// Flattens every application's products into `MedicationResult` records,
/// truncated to `limit`.
pub fn flatten_results(applications: Vec<FdaApplication>, limit: usize) -> Vec<MedicationResult> {
    applications
        .into_iter()
        .flat_map(|app| {
            let sponsor = app.sponsor_name;
            let number = app.application_number;
            app.products
                .into_iter()
                .map(move |product| MedicationResult {
                    name: product
                        .brand_name
                        .or(product.generic_name.clone())
                        .unwrap_or_else(|| "Unknown".into()),
                    prescribable_name: product.generic_name,
                    rx_norm_prescribable_name: None,
                    ndc_product_codes: product
                        .product_ndc
                        .map(OneOrMany::into_vec)
                        .unwrap_or_default(),
                    other_local_product_ids: Vec::new(),
                    route: product.route.map(OneOrMany::into_vec).unwrap_or_default(),
                    dosage_form: product.dosage_form,
                    strength: product
                        .active_ingredients
                        .into_iter()
                        .next()
                        .and_then(|i| i.strength),
                    manufacturer_name: sponsor.clone(),
                    application_number: number.clone(),
                })
        })
        .take(limit)
        .collect()
}

/// Result-count limit: default 20, clamped to 1..=100.
pub fn clamp_limit(limit: Option<i64>) -> usize {
    limit.unwrap_or(20).clamp(1, 100) as usize
}
