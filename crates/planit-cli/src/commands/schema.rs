use planit_core::entities::{
    CatalogRecord, Course, PlanState, RequirementRecord, RequirementsSelection,
};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

fn schema_value(type_name: SchemaType) -> anyhow::Result<serde_json::Value> {
    let schema = match type_name {
        SchemaType::Course => schema_for!(Course),
        SchemaType::Catalog => schema_for!(CatalogRecord),
        SchemaType::Requirement => schema_for!(RequirementRecord),
        SchemaType::Selection => schema_for!(RequirementsSelection),
        SchemaType::Plan => schema_for!(PlanState),
    };
    Ok(serde_json::to_value(schema)?)
}

/// Handle `planit schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_value(args.type_name)?, flags.format)
}

#[cfg(test)]
mod tests {
    use super::schema_value;
    use crate::cli::root_commands::SchemaType;

    #[test]
    fn course_schema_uses_wire_names() {
        let schema = schema_value(SchemaType::Course).expect("schema");
        assert_eq!(schema["title"], "Course");
        assert!(schema["properties"].get("tests").is_some());
        assert!(schema["properties"].get("exam_dates").is_none());
    }

    #[test]
    fn requirement_schema_requires_program_id() {
        let schema = schema_value(SchemaType::Requirement).expect("schema");
        let required = schema["required"].as_array().expect("required list");
        assert!(required.iter().any(|field| field == "programId"));
    }

    #[test]
    fn every_type_has_a_schema() {
        for type_name in [
            SchemaType::Course,
            SchemaType::Catalog,
            SchemaType::Requirement,
            SchemaType::Selection,
            SchemaType::Plan,
        ] {
            let schema = schema_value(type_name).expect("schema");
            assert!(schema.get("properties").is_some(), "{type_name:?}");
        }
    }
}
