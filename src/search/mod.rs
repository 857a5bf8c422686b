pub mod form;
pub mod model_select;
pub mod page;
pub mod types;

pub use form::{Field, HistoryMode, Navigation, SearchForm};
pub use model_select::{models_key, HttpModelsClient, ModelFetcher, ModelSelect, ModelsClient};
pub use page::{load_search_page, SearchPageData};
pub use types::{FilterState, Layout, PriceBound, SelectOption, ALL, PRICE_OPTIONS, RESULTS_PATH};
