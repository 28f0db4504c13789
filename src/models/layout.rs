use serde::Serialize;

/// One row of a location layout.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutRow {
    pub id: i64,
    pub location_id: i64,
    pub order: u32,
}

impl LayoutRow {
    /// Return the 1-indexed order.
    pub fn human_order(&self) -> u32 {
        self.order + 1
    }
}

/// A single cell in a layout row. Cells without a workstation are spacers.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutCell {
    pub id: i64,
    pub row_id: i64,
    pub workstation_id: Option<i64>,
    pub workstation_name: Option<String>,
    pub order: u32,
}

impl LayoutCell {
    pub fn is_workstation(&self) -> bool {
        self.workstation_id.is_some()
    }

    /// Return the 1-indexed order.
    pub fn human_order(&self) -> u32 {
        self.order + 1
    }
}

/// Data shown on top of a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellOverlay {
    pub data: String,
    pub intensity: u8, // percent, as supplied by the overlay point
}

/// One point of an overlay dataset, keyed by workstation.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayPoint {
    pub workstation_id: i64,
    pub value: f64,
    pub label: String,
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlaidCell {
    #[serde(flatten)]
    pub cell: LayoutCell,
    pub overlay: Option<CellOverlay>,
}
