use crate::models::{Make, Model};
use crate::search::models_key;
use crate::search::types::{
    make_options, model_options, price_options, FilterState, Layout, PriceBound, SelectOption,
    RESULTS_PATH,
};
use crate::web::PageSettings;
use maud::{html, Markup, PreEscaped, DOCTYPE};

const CSS: &str = r#"
*{box-sizing:border-box}
body{margin:0;font-family:system-ui,-apple-system,sans-serif;background:#f4f5f7;color:#1f2328}
.paper{margin:2rem auto;max-width:500px;padding:24px;background:#fff;border-radius:4px;
box-shadow:0 3px 5px -1px rgba(0,0,0,.2),0 5px 8px rgba(0,0,0,.14),0 1px 14px rgba(0,0,0,.12)}
.grid{display:grid;grid-template-columns:repeat(12,1fr);gap:24px}
.field{grid-column:span 12}
@media(min-width:600px){.field.span-6{grid-column:span 6}}
.field label{display:block;font-size:.8rem;color:#57606a;margin-bottom:.25rem}
.field select{width:100%;padding:.75rem;border:1px solid #c4c4c4;border-radius:4px;background:#fff;font-size:1rem}
.field option.placeholder{font-style:italic}
.submit{grid-column:span 12}
.submit button{width:100%;padding:.75rem;border:0;border-radius:4px;background:#3f51b5;color:#fff;font-size:.9rem;text-transform:uppercase;cursor:pointer}
"#;

fn options_html(options: &[SelectOption], selected: &str) -> Markup {
    html! {
        @for opt in options {
            option
                value=(opt.value)
                class=[opt.placeholder.then_some("placeholder")]
                selected[opt.value == selected] { (opt.label) }
        }
    }
}

fn select_html(
    id: &str,
    name: &str,
    label: &str,
    options: &[SelectOption],
    selected: &str,
    layout: Layout,
) -> Markup {
    let label_id = format!("{}-label", id);
    html! {
        div class=(format!("field span-{}", layout.field_span())) {
            label id=(label_id) for=(id) { (label) }
            select id=(id) name=(name) aria-labelledby=(label_id) {
                (options_html(options, selected))
            }
        }
    }
}

/// The search form with every dropdown seeded from `values`.
///
/// The `data-*` attributes hand the page script everything it needs to mirror
/// [`crate::search::ModelSelect`] and [`crate::search::SearchForm::submit`]:
/// the dedup window, the snap-back flag, the fetch key prefix and the raw
/// initial values, which survive submit even when no option matches them.
pub fn search_form(
    values: &FilterState,
    makes: &[Make],
    models: &[Model],
    settings: &PageSettings,
) -> Markup {
    let layout = settings.layout;
    html! {
        form #search-form method="get" action=(RESULTS_PATH)
            data-dedup-ms=(settings.dedup_window.as_millis().to_string())
            data-snap-model=(settings.snap_model_to_all.to_string())
            data-models-key=(models_key(""))
            data-initial-make=(values.make)
            data-initial-model=(values.model)
            data-initial-min-price=(values.min_price)
            data-initial-max-price=(values.max_price)
        {
            div.paper {
                div.grid {
                    (select_html("search-make", "make", "Make", &make_options(makes), &values.make, layout))
                    (select_html("search-model", "model", "Model", &model_options(models), &values.model, layout))
                    (select_html(
                        "search-min-price",
                        "minPrice",
                        "Min Price",
                        &price_options(PriceBound::Min),
                        &values.min_price,
                        layout,
                    ))
                    (select_html(
                        "search-max-price",
                        "maxPrice",
                        "Max Price",
                        &price_options(PriceBound::Max),
                        &values.max_price,
                        layout,
                    ))
                    input type="hidden" name="page" value="1";
                    div.submit { button type="submit" { "Search" } }
                }
            }
        }
    }
}

/// Full HTML document for the search page
pub fn search_page(form: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width,initial-scale=1";
                title { "Car Search" }
                style { (PreEscaped(CSS)) }
            }
            body {
                (form)
                script src="/assets/search.js" defer {}
            }
        }
    }
}
