use crate::condition::Condition;
use crate::spec::field::{ChoiceOption, FieldKind, FieldSpec, RangeSpec, ValueFormat};
use crate::spec::form::FormSpec;
use crate::spec::step::{CompletionRule, StepSpec, StepTitle};

pub const LOCATION: &str = "location";
pub const PROPERTY_TYPE: &str = "propertyType";
pub const PLOT_SIZE: &str = "plotSize";
pub const CONFIGURATION: &str = "configuration";
pub const BUDGET: &str = "budget";
pub const PROJECT_TYPE: &str = "projectType";
pub const POSSESSION_BY: &str = "possessionBy";
pub const DEVELOPER: &str = "developer";

const BHK_TYPES: &[&str] = &["apartment", "villa", "villament", "rowHouses"];
const VILLA_TYPES: &[&str] = &["villa", "villament", "rowHouses"];

/// The property-search intake wizard shipped with the product.
pub fn property_search_form() -> FormSpec {
    FormSpec {
        id: "property-search".into(),
        title: "Find your home".into(),
        version: "1.0.0".into(),
        steps: vec![
            location_step(),
            property_type_step(),
            plot_size_step(),
            configuration_step(),
            budget_step(),
            project_type_step(),
            developer_step(),
        ],
    }
}

fn location_step() -> StepSpec {
    StepSpec::new(
        LOCATION,
        StepTitle::Text("Tell us your preferred location or area to start".into()),
        vec![
            FieldSpec::new(
                LOCATION,
                "Search for a locality",
                FieldKind::Autocomplete {
                    placeholder: Some("Search for a locality (e.g. Indiranagar)".into()),
                },
            )
            .required(),
        ],
    )
    .completion(CompletionRule::ResolvedLocation {
        field: LOCATION.into(),
    })
}

fn property_type_step() -> StepSpec {
    StepSpec::new(
        PROPERTY_TYPE,
        StepTitle::Text("Perfect! Now, let's narrow down the property type a bit more.".into()),
        vec![
            FieldSpec::new(
                PROPERTY_TYPE,
                "Property Type",
                FieldKind::MultiSelect {
                    options: vec![
                        ChoiceOption::new("plot", "Plot").with_icon("📐"),
                        ChoiceOption::new("apartment", "Apartment").with_icon("🏢"),
                        ChoiceOption::new("villa", "Villa").with_icon("🏡"),
                        ChoiceOption::new("villament", "Villament").with_icon("🏘️"),
                        ChoiceOption::new("rowHouses", "Row Houses").with_icon("🏘️"),
                    ],
                    searchable: false,
                },
            )
            .required(),
        ],
    )
}

fn plot_size_step() -> StepSpec {
    StepSpec::new(
        PLOT_SIZE,
        StepTitle::Text("Understood. What range of plot size are you looking for?".into()),
        vec![
            FieldSpec::new(
                PLOT_SIZE,
                "Plot Size Range",
                FieldKind::Range(RangeSpec {
                    min_value: 0.0,
                    max_value: 50_000.0,
                    step: 1_000.0,
                    unit: Some("Sqft".into()),
                    format: ValueFormat::Plain,
                }),
            )
            .required(),
        ],
    )
    .visible_if(Condition::includes(PROPERTY_TYPE, "plot"))
    .skippable()
}

fn configuration_step() -> StepSpec {
    StepSpec::new(
        CONFIGURATION,
        StepTitle::Template(
            "Perfect. Which specific configurations do you have in mind for your {propertyType}?"
                .into(),
        ),
        vec![
            FieldSpec::new(
                CONFIGURATION,
                "Configuration",
                FieldKind::MultiSelect {
                    options: vec![
                        ChoiceOption::new("studio", "Studio").hidden_if(Condition::negate(
                            Condition::includes(PROPERTY_TYPE, "apartment"),
                        )),
                        ChoiceOption::new("1bhk", "1 BHK")
                            .hidden_if(Condition::only_from(PROPERTY_TYPE, VILLA_TYPES)),
                        ChoiceOption::new("1.5bhk", "1.5 BHK"),
                        ChoiceOption::new("2bhk", "2 BHK"),
                        ChoiceOption::new("2.5bhk", "2.5 BHK"),
                        ChoiceOption::new("3bhk", "3 BHK"),
                        ChoiceOption::new("3.5bhk", "3.5 BHK"),
                        ChoiceOption::new("4bhk", "4 BHK"),
                        ChoiceOption::new("5+bhk", "5+ BHK"),
                    ],
                    searchable: false,
                },
            )
            .required(),
        ],
    )
    .visible_if(Condition::includes_any(PROPERTY_TYPE, BHK_TYPES))
    .skippable()
}

fn budget_step() -> StepSpec {
    StepSpec::new(
        BUDGET,
        StepTitle::Text("Almost done! What is your preferred budget range?".into()),
        vec![
            FieldSpec::new(
                BUDGET,
                "Budget Range",
                FieldKind::Range(RangeSpec {
                    min_value: 0.0,
                    max_value: 50_000_000.0,
                    step: 100_000.0,
                    unit: Some("₹".into()),
                    format: ValueFormat::IndianCurrency,
                }),
            )
            .required(),
        ],
    )
    .skippable()
}

fn project_type_step() -> StepSpec {
    StepSpec::new(
        PROJECT_TYPE,
        StepTitle::Text("Select your preferred project type".into()),
        vec![
            FieldSpec::new(
                PROJECT_TYPE,
                "Project Type",
                FieldKind::MultiSelect {
                    options: vec![
                        ChoiceOption::new("preLaunch", "Pre Launch").with_icon("📋"),
                        ChoiceOption::new("underConstruction", "Under Construction")
                            .with_icon("🏗️"),
                        ChoiceOption::new("readyToMove", "Ready to Move").with_icon("🏠"),
                    ],
                    searchable: false,
                },
            )
            .required(),
            FieldSpec::new(
                POSSESSION_BY,
                "Possession By",
                FieldKind::SingleSelect {
                    options: vec![
                        ChoiceOption::new("within1yr", "Within 1 Yr"),
                        ChoiceOption::new("1yr-2yr", "1 Yr - 2 Yr"),
                        ChoiceOption::new("2yr-3yr", "2 Yr - 3 Yr"),
                        ChoiceOption::new("3yr-4yr", "3 Yr - 4 Yr"),
                        ChoiceOption::new("4+yrs", "4+ Yrs"),
                    ],
                },
            )
            .visible_if(Condition::non_empty(PROJECT_TYPE)),
        ],
    )
    .require_when(
        POSSESSION_BY,
        Condition::includes(PROJECT_TYPE, "underConstruction"),
    )
    .skippable()
}

fn developer_step() -> StepSpec {
    StepSpec::new(
        DEVELOPER,
        StepTitle::Text("Do you have a specific type of developer in mind?".into()),
        vec![FieldSpec::new(
            DEVELOPER,
            "Developers",
            FieldKind::MultiSelect {
                options: vec![
                    ChoiceOption::new("assetz", "Assetz"),
                    ChoiceOption::new("sattva", "Sattva"),
                    ChoiceOption::new("embassy", "Embassy"),
                    ChoiceOption::new("prestige", "Prestige"),
                    ChoiceOption::new("brigade", "Brigade"),
                    ChoiceOption::new("sobha", "Sobha"),
                    ChoiceOption::new("godrej", "Godrej"),
                ],
                searchable: true,
            },
        )],
    )
}
