//! Variant generation: expanding option axes into SKU-bearing drafts.
//!
//! Pure in-memory logic. The only degenerate input is "nothing to expand",
//! which yields an empty batch rather than an error.

use tracing::debug;

use crate::models::{Acknowledgement, ProductOption, VariantAttribute, VariantDraft};

/// Lowercases and hyphenates a display name into an identifier-safe slug.
/// Non-alphanumeric runs collapse to a single hyphen; no leading or
/// trailing hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Number of combinations `generate` will produce for these options.
///
/// An option with no values contributes a factor of 1 (it is skipped as an
/// axis, it does not annihilate the product). Zero only when no option has
/// any value.
pub fn preview_count(options: &[ProductOption]) -> usize {
    if options.iter().all(|option| option.values.is_empty()) {
        return 0;
    }
    options
        .iter()
        .map(|option| option.values.len().max(1))
        .product()
}

/// Expands options into the full Cartesian set of variant drafts, in
/// option order, one draft per value combination.
///
/// SKU: product-name slug joined with the slugged attribute values, in
/// option order. Drafts carry generation defaults (`quantity = 0`, active,
/// min/step quantity of 1). Options without values are skipped; if nothing
/// remains, the result is empty.
pub fn generate(product_name: &str, options: &[ProductOption]) -> Vec<VariantDraft> {
    let axes: Vec<&ProductOption> = options
        .iter()
        .filter(|option| !option.values.is_empty())
        .collect();
    if axes.is_empty() {
        return Vec::new();
    }

    let base = slugify(product_name);
    let mut combinations: Vec<Vec<VariantAttribute>> = vec![Vec::new()];
    for axis in &axes {
        let mut expanded = Vec::with_capacity(combinations.len() * axis.values.len());
        for combination in &combinations {
            for value in &axis.values {
                let mut attributes = combination.clone();
                attributes.push(VariantAttribute {
                    option: axis.name.clone(),
                    value: value.clone(),
                });
                expanded.push(attributes);
            }
        }
        combinations = expanded;
    }

    debug!(
        product = product_name,
        axes = axes.len(),
        count = combinations.len(),
        "generated variant combinations"
    );

    combinations
        .into_iter()
        .map(|attributes| {
            let mut sku = base.clone();
            for attribute in &attributes {
                let part = slugify(&attribute.value);
                if !part.is_empty() {
                    sku.push('-');
                    sku.push_str(&part);
                }
            }
            VariantDraft::new(sku, attributes)
        })
        .collect()
}

/// Outcome of a worksheet regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateOutcome {
    /// Drafts were replaced with a freshly generated batch.
    Replaced { count: usize },
    /// Generation produced nothing; existing drafts were left untouched.
    Skipped,
    /// The operator dismissed the confirmation; nothing changed.
    Aborted,
}

/// The in-memory draft list an admin edits before submitting a product.
///
/// Regeneration is a wholesale replacement that discards manual edits,
/// so replacing a non-empty worksheet requires an explicit
/// [`Acknowledgement`].
#[derive(Debug, Clone, Default)]
pub struct VariantWorksheet {
    drafts: Vec<VariantDraft>,
}

impl VariantWorksheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drafts(&self) -> &[VariantDraft] {
        &self.drafts
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Replaces the draft list with `generate(product_name, options)`.
    ///
    /// With existing drafts and a dismissed acknowledgement this aborts
    /// untouched. When generation yields nothing the worksheet is also left
    /// untouched and `Skipped` is returned, so the caller can decide
    /// whether that warrants a warning.
    pub fn regenerate(
        &mut self,
        product_name: &str,
        options: &[ProductOption],
        ack: Acknowledgement,
    ) -> RegenerateOutcome {
        if !self.drafts.is_empty() && !ack.is_accepted() {
            return RegenerateOutcome::Aborted;
        }
        let generated = generate(product_name, options);
        if generated.is_empty() {
            return RegenerateOutcome::Skipped;
        }
        let count = generated.len();
        self.drafts = generated;
        RegenerateOutcome::Replaced { count }
    }

    /// Edits the draft with the given SKU in place. Returns false when no
    /// draft matches.
    pub fn edit<F: FnOnce(&mut VariantDraft)>(&mut self, sku: &str, f: F) -> bool {
        match self.drafts.iter_mut().find(|draft| draft.sku == sku) {
            Some(draft) => {
                f(draft);
                true
            }
            None => false,
        }
    }

    /// Applies one edit to every draft.
    pub fn bulk_edit<F: FnMut(&mut VariantDraft)>(&mut self, mut f: F) {
        for draft in &mut self.drafts {
            f(draft);
        }
    }

    /// Removes the draft with the given SKU. Returns false when no draft
    /// matches.
    pub fn remove(&mut self, sku: &str) -> bool {
        let before = self.drafts.len();
        self.drafts.retain(|draft| draft.sku != sku);
        self.drafts.len() != before
    }
}
