use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alert {
    Oil,
    Belt,
    Overage,
}

impl Alert {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alert::Oil => "oil",
            Alert::Belt => "belt",
            Alert::Overage => "overage",
        }
    }
}

/// Alerts derived for one record. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertSet {
    pub oil: bool,
    pub belt: bool,
    pub overage: bool,
}

impl AlertSet {
    /// Oil or belt: the thresholds that move a record to scheduling.
    pub fn change_due(&self) -> bool {
        self.oil || self.belt
    }

    pub fn is_empty(&self) -> bool {
        !(self.oil || self.belt || self.overage)
    }

    pub fn contains(&self, alert: Alert) -> bool {
        match alert {
            Alert::Oil => self.oil,
            Alert::Belt => self.belt,
            Alert::Overage => self.overage,
        }
    }

    pub fn to_vec(&self) -> Vec<Alert> {
        [Alert::Oil, Alert::Belt, Alert::Overage]
            .into_iter()
            .filter(|a| self.contains(*a))
            .collect()
    }

    /// "oil,overage" style tag list for tables and exports.
    pub fn tags(&self) -> String {
        self.to_vec()
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}
