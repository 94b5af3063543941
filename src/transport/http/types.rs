use crate::app::ShipCatalog;
use crate::domain::error::CatalogError;
use crate::domain::ship::page::DEFAULT_PAGE_SIZE;
use crate::domain::ship::{PageRequest, ShipFilter, ShipOrder, ShipType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub catalog: ShipCatalog,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>, data: Option<JsonValue>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }
}

/// Filter, ordering and paging parameters accepted by the listing endpoints.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipListParams {
    /// Substring of the ship name (case-sensitive).
    pub name: Option<String>,
    /// Substring of the planet (case-sensitive).
    pub planet: Option<String>,
    /// TRANSPORT, MILITARY or MERCHANT.
    pub ship_type: Option<String>,
    /// Earliest production date, epoch milliseconds (inclusive).
    pub after: Option<i64>,
    /// Latest production date, epoch milliseconds (inclusive).
    pub before: Option<i64>,
    pub is_used: Option<bool>,
    #[param(value_type = Option<f64>)]
    pub min_speed: Option<Decimal>,
    #[param(value_type = Option<f64>)]
    pub max_speed: Option<Decimal>,
    pub min_crew_size: Option<i32>,
    pub max_crew_size: Option<i32>,
    #[param(value_type = Option<f64>)]
    pub min_rating: Option<Decimal>,
    #[param(value_type = Option<f64>)]
    pub max_rating: Option<Decimal>,
    /// ID (default), SPEED, DATE or RATING.
    pub order: Option<String>,
    /// Zero-based page number (default 0).
    pub page_number: Option<u32>,
    /// Page size (default 3).
    pub page_size: Option<u32>,
}

impl ShipListParams {
    pub fn filter(&self) -> Result<ShipFilter, CatalogError> {
        let ship_type = self
            .ship_type
            .as_deref()
            .map(str::parse::<ShipType>)
            .transpose()
            .map_err(|e| CatalogError::bad_request(e.to_string()))?;

        Ok(ShipFilter {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type,
            after: self.after,
            before: self.before,
            is_used: self.is_used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        })
    }

    pub fn page_request(&self) -> Result<PageRequest, CatalogError> {
        let order = self
            .order
            .as_deref()
            .map(str::parse::<ShipOrder>)
            .transpose()
            .map_err(|e| CatalogError::bad_request(e.to_string()))?
            .unwrap_or_default();
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(CatalogError::bad_request("pageSize must be at least 1"));
        }
        Ok(PageRequest {
            page_number: self.page_number.unwrap_or(0),
            page_size,
            order,
        })
    }
}
