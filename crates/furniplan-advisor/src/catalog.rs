//! Products, resources and the fixed consumption matrix.

use serde::{Deserialize, Serialize};

use crate::{AdvisorError, Result};

/// Largest accepted availability, so remaining stock always fits an `i64`
pub const MAX_AVAILABILITY: u64 = i64::MAX as u64;

/// A product the factory can make
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Unit revenue, never negative
    pub price: f64,
}

/// A raw material with a limited stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    /// Units available for this planning session
    pub availability: u64,
}

/// Units of each resource consumed per item of each product.
///
/// Rows are resources, columns are products. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumptionMatrix {
    rows: Vec<Vec<u32>>,
}

impl ConsumptionMatrix {
    /// Build a matrix from resource rows; every row must have the same width
    pub fn new(rows: Vec<Vec<u32>>) -> Result<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(AdvisorError::EmptyMatrix);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(AdvisorError::RaggedMatrix {
                row,
                expected: width,
                found: r.len(),
            });
        }
        Ok(Self { rows })
    }

    pub fn num_resources(&self) -> usize {
        self.rows.len()
    }

    pub fn num_products(&self) -> usize {
        self.rows[0].len()
    }

    /// Units of `resource` used by one item of `product`
    pub fn get(&self, resource: usize, product: usize) -> u32 {
        self.rows[resource][product]
    }

    pub fn row(&self, resource: usize) -> &[u32] {
        &self.rows[resource]
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }

    /// `matrix · quantities`, one entry per resource
    pub fn consumption(&self, quantities: &[u32]) -> Vec<u64> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(quantities)
                    .map(|(&per_item, &qty)| u64::from(per_item) * u64::from(qty))
                    .fold(0u64, u64::saturating_add)
            })
            .collect()
    }

    /// `matrix · quantities` for a continuous plan
    pub fn consumption_f64(&self, quantities: &[f64]) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(quantities)
                    .map(|(&per_item, &qty)| f64::from(per_item) * qty)
                    .sum()
            })
            .collect()
    }
}

/// Integer production quantities, one per product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductionPlan(Vec<u32>);

impl ProductionPlan {
    pub fn new(quantities: Vec<u32>) -> Self {
        Self(quantities)
    }

    /// A plan producing nothing
    pub fn zeros(products: usize) -> Self {
        Self(vec![0; products])
    }

    pub fn quantities(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, product: usize) -> Option<u32> {
        self.0.get(product).copied()
    }

    pub fn set(&mut self, product: usize, quantity: u32) -> Result<()> {
        let len = self.0.len();
        let slot = self
            .0
            .get_mut(product)
            .ok_or(AdvisorError::UnknownProduct { index: product, count: len })?;
        *slot = quantity;
        Ok(())
    }
}

/// Everything the advisor needs to know about the factory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
    resources: Vec<Resource>,
    matrix: ConsumptionMatrix,
}

impl Catalog {
    pub fn new(products: Vec<Product>, resources: Vec<Resource>, matrix: ConsumptionMatrix) -> Result<Self> {
        if matrix.num_products() != products.len() || matrix.num_resources() != resources.len() {
            return Err(AdvisorError::DimensionMismatch {
                resources: resources.len(),
                products: products.len(),
                rows: matrix.num_resources(),
                cols: matrix.num_products(),
            });
        }
        for product in &products {
            check_price(&product.name, product.price)?;
        }
        for resource in &resources {
            check_availability(&resource.name, resource.availability)?;
        }
        Ok(Self {
            products,
            resources,
            matrix,
        })
    }

    /// The furniture shop: three kinds of lumber, four products
    pub fn furniture() -> Self {
        let products = [("Escrivaninha", 100.0), ("Mesa", 80.0), ("Armário", 120.0), ("Prateleira", 20.0)]
            .into_iter()
            .map(|(name, price)| Product {
                name: name.to_string(),
                price,
            })
            .collect();
        let resources = [("Tábua", 250), ("Prancha", 600), ("Painéis", 500)]
            .into_iter()
            .map(|(name, availability)| Resource {
                name: name.to_string(),
                availability,
            })
            .collect();
        let matrix = ConsumptionMatrix {
            rows: vec![vec![1, 1, 1, 4], vec![0, 1, 1, 2], vec![3, 2, 4, 0]],
        };
        Self {
            products,
            resources,
            matrix,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn matrix(&self) -> &ConsumptionMatrix {
        &self.matrix
    }

    pub fn prices(&self) -> Vec<f64> {
        self.products.iter().map(|p| p.price).collect()
    }

    pub fn availability(&self) -> Vec<u64> {
        self.resources.iter().map(|r| r.availability).collect()
    }

    pub fn set_price(&mut self, product: usize, price: f64) -> Result<()> {
        let count = self.products.len();
        let entry = self
            .products
            .get_mut(product)
            .ok_or(AdvisorError::UnknownProduct { index: product, count })?;
        check_price(&entry.name, price)?;
        entry.price = price;
        Ok(())
    }

    pub fn set_availability(&mut self, resource: usize, amount: u64) -> Result<()> {
        let count = self.resources.len();
        let entry = self
            .resources
            .get_mut(resource)
            .ok_or(AdvisorError::UnknownResource { index: resource, count })?;
        check_availability(&entry.name, amount)?;
        entry.availability = amount;
        Ok(())
    }

    /// Replace every price at once
    pub fn set_prices(&mut self, prices: &[f64]) -> Result<()> {
        if prices.len() != self.products.len() {
            return Err(AdvisorError::LengthMismatch {
                what: "prices",
                expected: self.products.len(),
                found: prices.len(),
            });
        }
        for (product, &price) in self.products.iter().zip(prices) {
            check_price(&product.name, price)?;
        }
        for (product, &price) in self.products.iter_mut().zip(prices) {
            product.price = price;
        }
        Ok(())
    }

    /// Replace every availability at once
    pub fn set_availabilities(&mut self, amounts: &[u64]) -> Result<()> {
        if amounts.len() != self.resources.len() {
            return Err(AdvisorError::LengthMismatch {
                what: "availability",
                expected: self.resources.len(),
                found: amounts.len(),
            });
        }
        for (resource, &amount) in self.resources.iter().zip(amounts) {
            check_availability(&resource.name, amount)?;
        }
        for (resource, &amount) in self.resources.iter_mut().zip(amounts) {
            resource.availability = amount;
        }
        Ok(())
    }

    /// Check that a plan has one quantity per product
    pub fn check_plan(&self, plan: &ProductionPlan) -> Result<()> {
        if plan.len() != self.products.len() {
            return Err(AdvisorError::LengthMismatch {
                what: "quantities",
                expected: self.products.len(),
                found: plan.len(),
            });
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::furniture()
    }
}

fn check_price(product: &str, price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AdvisorError::InvalidPrice {
            product: product.to_string(),
            price,
        });
    }
    Ok(())
}

fn check_availability(resource: &str, amount: u64) -> Result<()> {
    if amount > MAX_AVAILABILITY {
        return Err(AdvisorError::InvalidAvailability {
            resource: resource.to_string(),
            amount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_furniture_catalog_shape() {
        let catalog = Catalog::furniture();
        assert_eq!(catalog.products().len(), 4);
        assert_eq!(catalog.resources().len(), 3);
        assert_eq!(catalog.matrix().num_resources(), 3);
        assert_eq!(catalog.matrix().num_products(), 4);
        assert_eq!(catalog.prices(), vec![100.0, 80.0, 120.0, 20.0]);
        assert_eq!(catalog.availability(), vec![250, 600, 500]);
        assert_eq!(catalog.matrix().row(2), &[3, 2, 4, 0]);
    }

    #[test]
    fn test_consumption_is_matrix_product() {
        let matrix = Catalog::furniture().matrix().clone();
        assert_eq!(matrix.consumption(&[25, 25, 25, 25]), vec![175, 100, 225]);
        assert_eq!(matrix.consumption(&[0, 0, 0, 125]), vec![500, 250, 0]);
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let err = ConsumptionMatrix::new(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, AdvisorError::RaggedMatrix { row: 1, expected: 2, found: 1 }));
        assert!(matches!(ConsumptionMatrix::new(vec![]), Err(AdvisorError::EmptyMatrix)));
    }

    #[test]
    fn test_catalog_dimensions_checked() {
        let matrix = ConsumptionMatrix::new(vec![vec![1, 2]]).unwrap();
        let products = vec![Product {
            name: "a".to_string(),
            price: 1.0,
        }];
        let resources = vec![Resource {
            name: "r".to_string(),
            availability: 1,
        }];
        assert!(matches!(
            Catalog::new(products, resources, matrix),
            Err(AdvisorError::DimensionMismatch { products: 1, cols: 2, .. })
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut catalog = Catalog::furniture();
        assert!(matches!(catalog.set_price(0, -1.0), Err(AdvisorError::InvalidPrice { .. })));
        assert!(matches!(catalog.set_price(1, f64::NAN), Err(AdvisorError::InvalidPrice { .. })));
        assert!(matches!(catalog.set_price(9, 1.0), Err(AdvisorError::UnknownProduct { index: 9, count: 4 })));
        assert_eq!(catalog.prices()[0], 100.0);

        catalog.set_price(0, 150.0).unwrap();
        assert_eq!(catalog.prices()[0], 150.0);
    }

    #[test]
    fn test_bulk_updates_are_all_or_nothing() {
        let mut catalog = Catalog::furniture();
        assert!(catalog.set_prices(&[1.0, -2.0, 3.0, 4.0]).is_err());
        assert_eq!(catalog.prices(), vec![100.0, 80.0, 120.0, 20.0]);
        assert!(catalog.set_availabilities(&[1, 2]).is_err());

        catalog.set_availabilities(&[10, 20, 30]).unwrap();
        assert_eq!(catalog.availability(), vec![10, 20, 30]);
    }

    #[test]
    fn test_availability_capped() {
        let mut catalog = Catalog::furniture();
        assert!(matches!(
            catalog.set_availability(0, u64::MAX),
            Err(AdvisorError::InvalidAvailability { amount: u64::MAX, .. })
        ));
        assert!(catalog.set_availabilities(&[1, MAX_AVAILABILITY + 1, 1]).is_err());
        assert_eq!(catalog.availability(), vec![250, 600, 500]);

        catalog.set_availability(0, MAX_AVAILABILITY).unwrap();
        assert_eq!(catalog.availability()[0], MAX_AVAILABILITY);
    }

    #[test]
    fn test_consumption_saturates() {
        let matrix = ConsumptionMatrix::new(vec![vec![u32::MAX; 4]]).unwrap();
        assert_eq!(matrix.consumption(&[u32::MAX; 4]), vec![u64::MAX]);
    }

    #[test]
    fn test_plan_set_out_of_range() {
        let mut plan = ProductionPlan::zeros(4);
        plan.set(3, 7).unwrap();
        assert_eq!(plan.quantities(), &[0, 0, 0, 7]);
        assert!(plan.set(4, 1).is_err());
    }
}
