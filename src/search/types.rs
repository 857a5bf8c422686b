use crate::models::{Make, Model};

/// Filter value meaning "no filter on this dimension"
pub const ALL: &str = "all";

/// Price steps offered by both the min and max price dropdowns
pub const PRICE_OPTIONS: [u64; 7] = [500, 1000, 5000, 15000, 25000, 50000, 250000];

/// Route the form navigates to on submit
pub const RESULTS_PATH: &str = "/cars";

/// Current selections of the search form, written into the URL by [`FilterState::to_query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub make: String,
    pub model: String,
    pub min_price: String,
    pub max_price: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            make: ALL.to_string(),
            model: ALL.to_string(),
            min_price: ALL.to_string(),
            max_price: ALL.to_string(),
        }
    }
}

impl FilterState {
    /// Seed the filters from raw query pairs. Absent or empty keys become `all`;
    /// any other value is kept as-is, even if no dropdown offers it.
    pub fn from_query(query: &[(String, String)]) -> Self {
        let field = |key: &str| {
            query_value(query, key)
                .filter(|v| !v.is_empty())
                .unwrap_or(ALL)
                .to_string()
        };

        Self {
            make: field("make"),
            model: field("model"),
            min_price: field("minPrice"),
            max_price: field("maxPrice"),
        }
    }

    /// Query pairs in URL order: make, model, minPrice, maxPrice
    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("make".to_string(), self.make.clone()),
            ("model".to_string(), self.model.clone()),
            ("minPrice".to_string(), self.min_price.clone()),
            ("maxPrice".to_string(), self.max_price.clone()),
        ]
    }
}

/// Collapse a possibly repeated query key to its first value
pub fn query_value<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Grid layout of the form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    SingleColumn,
    #[default]
    TwoColumn,
}

impl Layout {
    pub fn from_single_column(single_column: bool) -> Self {
        if single_column {
            Self::SingleColumn
        } else {
            Self::TwoColumn
        }
    }

    /// Grid columns (out of 12) one field spans on wide screens
    pub fn field_span(self) -> u8 {
        match self {
            Self::SingleColumn => 12,
            Self::TwoColumn => 6,
        }
    }
}

/// One entry of a rendered dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    /// The leading `all` entry, rendered emphasized
    pub placeholder: bool,
}

impl SelectOption {
    fn placeholder(label: &str) -> Self {
        Self {
            value: ALL.to_string(),
            label: label.to_string(),
            placeholder: true,
        }
    }

    fn entry(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            placeholder: false,
        }
    }
}

/// Which price bound a dropdown edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBound {
    Min,
    Max,
}

pub fn make_options(makes: &[Make]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::placeholder("All Cars"))
        .chain(
            makes
                .iter()
                .map(|m| SelectOption::entry(&m.make, format!("{} ({})", m.make, m.count))),
        )
        .collect()
}

pub fn model_options(models: &[Model]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::placeholder("All Models"))
        .chain(
            models
                .iter()
                .map(|m| SelectOption::entry(&m.model, format!("{} ({})", m.model, m.count))),
        )
        .collect()
}

pub fn price_options(bound: PriceBound) -> Vec<SelectOption> {
    let label = match bound {
        PriceBound::Min => "No Min",
        PriceBound::Max => "No Max",
    };

    std::iter::once(SelectOption::placeholder(label))
        .chain(
            PRICE_OPTIONS
                .iter()
                .map(|p| SelectOption::entry(p.to_string(), p.to_string())),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_query_defaults_to_all() {
        assert_eq!(FilterState::from_query(&[]), FilterState::default());
    }

    #[test]
    fn parses_known_keys() {
        let state = FilterState::from_query(&pairs(&[("make", "Toyota"), ("minPrice", "5000")]));
        assert_eq!(
            state,
            FilterState {
                make: "Toyota".into(),
                model: ALL.into(),
                min_price: "5000".into(),
                max_price: ALL.into(),
            }
        );
    }

    #[test]
    fn repeated_key_takes_first_value() {
        let state = FilterState::from_query(&pairs(&[("make", "Audi"), ("make", "Ford")]));
        assert_eq!(state.make, "Audi");
    }

    #[test]
    fn empty_value_is_all_and_unknown_value_is_kept() {
        let state = FilterState::from_query(&pairs(&[("model", ""), ("maxPrice", "123abc")]));
        assert_eq!(state.model, ALL);
        assert_eq!(state.max_price, "123abc");
    }

    #[test]
    fn ignores_unrelated_keys() {
        let state = FilterState::from_query(&pairs(&[("page", "4"), ("min_price", "500")]));
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn to_query_round_trips_through_from_query() {
        let state = FilterState {
            make: "Kia".into(),
            model: ALL.into(),
            min_price: "1000".into(),
            max_price: "50000".into(),
        };
        let query = state.to_query();

        let keys: Vec<&str> = query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["make", "model", "minPrice", "maxPrice"]);
        assert_eq!(FilterState::from_query(&query), state);
    }

    #[test]
    fn make_option_labels_include_counts() {
        let options = make_options(&[Make { make: "Ford".into(), count: 3 }]);
        assert_eq!(options[0], SelectOption::placeholder("All Cars"));
        assert_eq!(options[1].value, "Ford");
        assert_eq!(options[1].label, "Ford (3)");
    }

    #[test]
    fn price_options_share_the_fixed_steps() {
        let min = price_options(PriceBound::Min);
        let max = price_options(PriceBound::Max);

        assert_eq!(min[0].label, "No Min");
        assert_eq!(max[0].label, "No Max");
        assert_eq!(min[1..], max[1..]);
        let values: Vec<&str> = min[1..].iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["500", "1000", "5000", "15000", "25000", "50000", "250000"]);
    }

    #[test]
    fn layout_spans() {
        assert_eq!(Layout::from_single_column(true).field_span(), 12);
        assert_eq!(Layout::from_single_column(false).field_span(), 6);
    }
}
