use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unit for a variant's net weight or volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum WeightUnit {
    G,
    Kg,
    Ml,
    L,
}

/// One selected option value on a variant, e.g. `Weight = 250g`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAttribute {
    pub option: String,
    pub value: String,
}

/// A draft product variant, one per option-value combination.
///
/// Drafts live in memory until submitted as part of product creation.
/// `attributes` carries exactly one entry per contributing option, in
/// option order, and `sku` is unique within a generated batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantDraft {
    pub sku: String,
    pub attributes: Vec<VariantAttribute>,
    pub quantity: i32,
    pub is_active: bool,
    pub min_order_qty: i32,
    pub step_qty: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_override: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<WeightUnit>,
}

impl VariantDraft {
    /// A fresh draft with generation defaults: zero stock, active, minimum
    /// and step quantity of one.
    pub fn new(sku: impl Into<String>, attributes: Vec<VariantAttribute>) -> Self {
        Self {
            sku: sku.into(),
            attributes,
            quantity: 0,
            is_active: true,
            min_order_qty: 1,
            step_qty: 1,
            price_override: None,
            weight_value: None,
            weight_unit: None,
        }
    }

    /// Looks up the selected value for an option name.
    pub fn attribute(&self, option: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.option == option)
            .map(|attr| attr.value.as_str())
    }
}
