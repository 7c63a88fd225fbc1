//! Section renaming after the core competency rename

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow, bail};
use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{CoreCompetency, CoreCompetencySet, D2Section};

static SECTION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*) (Outputs|Outcomes)$").unwrap());

/// Old core competency names mapped to their current names
pub fn core_competency_renames() -> HashMap<String, String> {
    [
        ("SHELTER", "SHELTER & SETTLEMENTS"),
        ("FOOD SECURITY", "LIVELIHOODS & FOOD SECURITY"),
        ("CAMP MANAGEMENT", "PROTECTION FROM VIOLENCE"),
    ]
    .into_iter()
    .map(|(old, new)| (old.to_string(), new.to_string()))
    .collect()
}

/// Core competency groups indexed by name
#[derive(Debug, Clone, Default)]
pub struct CoreCompetencies {
    by_name: HashMap<String, CoreCompetency>,
}

impl CoreCompetencies {
    pub fn new(set: CoreCompetencySet) -> Self {
        Self {
            by_name: set
                .data_element_groups
                .into_iter()
                .map(|group| (group.name.clone(), group))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CoreCompetency> {
        self.by_name.get(name)
    }

    /// Sorted names, for logging
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Rewrite name and code of a section from its core competency.
///
/// Returns `None` when the section is already up to date.
pub fn fix_section(
    section: &D2Section,
    core_competencies: &CoreCompetencies,
    renames: &HashMap<String, String>,
) -> Result<Option<D2Section>> {
    let captures = SECTION_NAME.captures(&section.name).ok_or_else(|| {
        anyhow!(
            "Cannot match section: id='{}' name='{}'",
            section.id,
            section.name
        )
    })?;
    let (section_name, section_type) = (&captures[1], &captures[2]);
    if section_name.is_empty() {
        bail!(
            "Cannot match section: id='{}' name='{}'",
            section.id,
            section.name
        );
    }

    let cc_name = renames
        .get(section_name)
        .map(String::as_str)
        .unwrap_or(section_name);
    log::debug!(
        "section {} ({}): sectionName={}, type={}",
        section.id,
        section.name,
        section_name,
        section_type
    );

    let core_competency = core_competencies
        .get(cc_name)
        .with_context(|| format!("Core competency (DEGroup) not found: name='{}'", cc_name))?;
    let cc_code = core_competency.code.as_deref().with_context(|| {
        format!("Core competency (DEGroup) has no code: name='{}'", cc_name)
    })?;

    let name = format!("{} {}", core_competency.name, section_type);
    let code = format!(
        "{}_{}_{}",
        section.data_set.id,
        section_type.to_uppercase(),
        cc_code
    );

    if section.name == name && section.code.as_deref() == Some(code.as_str()) {
        return Ok(None);
    }

    Ok(Some(D2Section {
        name,
        code: Some(code),
        ..section.clone()
    }))
}

/// Order sections by greyed field count, largest first, and split them into
/// chunks for sequential submission
pub fn plan_chunks(mut sections: Vec<D2Section>, chunk_size: usize) -> Vec<Vec<D2Section>> {
    sections.sort_by_key(|section| section.greyed_fields.len());
    sections.reverse();
    sections
        .chunks(chunk_size.max(1))
        .map(<[D2Section]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::metadata::Ref;
    use serde_json::{Map, json};

    fn section(id: &str, name: &str, code: Option<&str>, greyed: usize) -> D2Section {
        D2Section {
            id: id.to_string(),
            name: name.to_string(),
            code: code.map(str::to_string),
            data_set: Ref::new("dsAbc000001"),
            greyed_fields: (0..greyed).map(|i| json!({ "id": i })).collect(),
            fields: Map::new(),
        }
    }

    fn core_competencies() -> CoreCompetencies {
        let set: CoreCompetencySet = serde_json::from_value(json!({
            "code": "GL_CoreComp_DEGROUPSET",
            "dataElementGroups": [
                { "id": "degShelter1", "code": "SHELTER_SETTLEMENTS", "name": "SHELTER & SETTLEMENTS" },
                { "id": "degWASH0001", "code": "WASH", "name": "WASH" },
                { "id": "degNoCode01", "name": "EDUCATION" }
            ]
        }))
        .unwrap();
        CoreCompetencies::new(set)
    }

    #[test]
    fn test_renamed_core_competency() {
        let fixed = fix_section(
            &section("sec1", "SHELTER Outputs", None, 0),
            &core_competencies(),
            &core_competency_renames(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(fixed.name, "SHELTER & SETTLEMENTS Outputs");
        assert_eq!(fixed.code.as_deref(), Some("dsAbc000001_OUTPUTS_SHELTER_SETTLEMENTS"));
        assert_eq!(fixed.id, "sec1");
    }

    #[test]
    fn test_unrenamed_section_gets_code() {
        let fixed = fix_section(
            &section("sec2", "WASH Outcomes", Some("OLD"), 0),
            &core_competencies(),
            &core_competency_renames(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(fixed.name, "WASH Outcomes");
        assert_eq!(fixed.code.as_deref(), Some("dsAbc000001_OUTCOMES_WASH"));
    }

    #[test]
    fn test_up_to_date_section_is_skipped() {
        let current = section("sec3", "WASH Outputs", Some("dsAbc000001_OUTPUTS_WASH"), 2);
        let fixed = fix_section(&current, &core_competencies(), &core_competency_renames()).unwrap();
        assert!(fixed.is_none());
    }

    #[test]
    fn test_unmatched_name_is_an_error() {
        let err = fix_section(
            &section("sec4", "WASH Indicators", None, 0),
            &core_competencies(),
            &core_competency_renames(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Cannot match section: id='sec4'"));
    }

    #[test]
    fn test_unknown_core_competency_is_an_error() {
        let err = fix_section(
            &section("sec5", "HEALTH Outputs", None, 0),
            &core_competencies(),
            &core_competency_renames(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("name='HEALTH'"));

        let err = fix_section(
            &section("sec6", "EDUCATION Outputs", None, 0),
            &core_competencies(),
            &core_competency_renames(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("has no code"));
    }

    #[test]
    fn test_plan_chunks_orders_by_greyed_fields() {
        let sections: Vec<D2Section> = (0..12)
            .map(|i| section(&format!("sec{}", i), "WASH Outputs", None, i))
            .collect();

        let chunks = plan_chunks(sections, 10);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 10);
        assert_eq!(chunks[1].len(), 2);
        assert_eq!(chunks[0][0].id, "sec11");
        assert_eq!(chunks[1][1].id, "sec0");
    }

    #[test]
    fn test_plan_chunks_equal_counts_last_read_first() {
        let sections = vec![
            section("first", "WASH Outputs", None, 1),
            section("second", "WASH Outputs", None, 1),
            section("big", "WASH Outputs", None, 3),
        ];

        let ids: Vec<String> = plan_chunks(sections, 10)[0].iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec!["big", "second", "first"]);
    }

    #[test]
    fn test_plan_chunks_empty() {
        assert!(plan_chunks(Vec::new(), 10).is_empty());
    }
}
