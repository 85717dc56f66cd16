//! Catalog products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Error, Price, ProductId};

const MAX_RATING: f64 = 5.0;

/// A product offered in the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[schema(example = "Chew Toy")]
    pub name: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
    #[schema(example = "Toys")]
    pub category: String,
    pub description: String,
    /// Average rating between 0 and 5.
    pub rating: f64,
    /// Number of reviews behind the rating.
    pub reviews: u32,
    pub is_new: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw product fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductInput {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub is_new: Option<bool>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_price(amount: f64) -> Result<Price, Error> {
    Price::from_decimal(amount).map_err(|_| Error::invalid_request("Invalid price"))
}

fn check_rating(rating: f64) -> Result<f64, Error> {
    if rating.is_finite() && (0.0..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(Error::invalid_request("Rating must be between 0 and 5"))
    }
}

/// Validated input for a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: f64,
    pub reviews: u32,
    pub is_new: bool,
}

impl ProductDraft {
    /// Validate creation input; name, price and category are required.
    pub fn try_from_input(input: &ProductInput) -> Result<Self, Error> {
        let (Some(name), Some(price), Some(category)) = (
            present(input.name.as_ref()),
            input.price,
            present(input.category.as_ref()),
        ) else {
            return Err(Error::invalid_request("Please provide all required fields"));
        };
        Ok(Self {
            name: name.to_owned(),
            price: parse_price(price)?,
            image: input.image.clone().unwrap_or_default(),
            category: category.to_owned(),
            description: input.description.clone().unwrap_or_default(),
            rating: input.rating.map(check_rating).transpose()?.unwrap_or_default(),
            reviews: input.reviews.unwrap_or_default(),
            is_new: input.is_new.unwrap_or_default(),
        })
    }
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub is_new: Option<bool>,
}

impl ProductChanges {
    pub fn try_from_input(input: &ProductInput) -> Result<Self, Error> {
        Ok(Self {
            name: present(input.name.as_ref()).map(str::to_owned),
            price: input.price.map(parse_price).transpose()?,
            image: input.image.clone(),
            category: present(input.category.as_ref()).map(str::to_owned),
            description: input.description.clone(),
            rating: input.rating.map(check_rating).transpose()?,
            reviews: input.reviews,
            is_new: input.is_new,
        })
    }

    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
        if let Some(reviews) = self.reviews {
            product.reviews = reviews;
        }
        if let Some(is_new) = self.is_new {
            product.is_new = is_new;
        }
        product.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input() -> ProductInput {
        ProductInput {
            name: Some("Chew Toy".to_owned()),
            price: Some(9.99),
            category: Some("Toys".to_owned()),
            ..ProductInput::default()
        }
    }

    #[rstest]
    fn draft_applies_defaults() {
        let draft = ProductDraft::try_from_input(&input()).expect("valid draft");
        assert_eq!(draft.price.cents(), 999);
        assert_eq!(draft.rating, 0.0);
        assert_eq!(draft.reviews, 0);
        assert!(!draft.is_new);
        assert_eq!(draft.image, "");
    }

    #[rstest]
    #[case::name(|i: &mut ProductInput| i.name = None)]
    #[case::price(|i: &mut ProductInput| i.price = None)]
    #[case::category(|i: &mut ProductInput| i.category = Some("  ".to_owned()))]
    fn draft_requires_core_fields(#[case] strip: fn(&mut ProductInput)) {
        let mut raw = input();
        strip(&mut raw);
        let err = ProductDraft::try_from_input(&raw).expect_err("missing field");
        assert_eq!(err.message(), "Please provide all required fields");
    }

    #[rstest]
    #[case(-0.5)]
    #[case(5.5)]
    #[case(f64::NAN)]
    fn ratings_outside_range_are_rejected(#[case] rating: f64) {
        let mut raw = input();
        raw.rating = Some(rating);
        assert!(ProductDraft::try_from_input(&raw).is_err());
    }

    #[rstest]
    fn changes_leave_absent_fields_untouched() {
        let draft = ProductDraft::try_from_input(&input()).expect("valid draft");
        let now = Utc::now();
        let mut product = Product {
            id: ProductId::random(),
            name: draft.name,
            price: draft.price,
            image: draft.image,
            category: draft.category,
            description: draft.description,
            rating: draft.rating,
            reviews: draft.reviews,
            is_new: draft.is_new,
            created_at: now,
            updated_at: now,
        };
        let changes = ProductChanges::try_from_input(&ProductInput {
            price: Some(12.5),
            is_new: Some(true),
            ..ProductInput::default()
        })
        .expect("valid changes");

        changes.apply(&mut product, now);

        assert_eq!(product.name, "Chew Toy");
        assert_eq!(product.price.cents(), 1_250);
        assert!(product.is_new);
    }
}
