// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::actions::{compile, coverage, pack, restore, test};
use crate::config::defaults::default_targets;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{BuilddagError, Result};
use crate::exec::template::unknown_placeholders;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = BuilddagError;

    fn try_from(mut raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        if raw.target.is_empty() {
            raw.target = default_targets()?;
        }
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_targets(cfg)?;
    validate_build_section(cfg)?;
    validate_version_section(cfg)?;
    validate_target_relations(cfg)?;
    validate_target_actions(cfg)?;
    validate_templates(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_targets(cfg: &RawConfigFile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(BuilddagError::ConfigError(
            "pipeline must contain at least one [target.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_build_section(cfg: &RawConfigFile) -> Result<()> {
    if !cfg.target.contains_key(&cfg.build.primary) {
        return Err(BuilddagError::ConfigError(format!(
            "[build].primary names unknown target '{}'",
            cfg.build.primary
        )));
    }
    if cfg.build.test_project_suffix.trim().is_empty() {
        return Err(BuilddagError::ConfigError(
            "[build].test_project_suffix must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_version_section(cfg: &RawConfigFile) -> Result<()> {
    if let Some(fixed) = &cfg.version.fixed {
        validate_package_version("[version].fixed", fixed)?;
    }
    Ok(())
}

/// Check that a fixed package version (from `field`) is a semantic version.
pub fn validate_package_version(field: &str, value: &str) -> Result<()> {
    semver::Version::parse(value.trim()).map_err(|e| {
        BuilddagError::ConfigError(format!("{field} '{value}' is not a semantic version: {e}"))
    })?;
    Ok(())
}

fn validate_target_relations(cfg: &RawConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        let relations = [
            ("depends_on", &target.depends_on),
            ("before", &target.before),
            ("after", &target.after),
            ("triggered_by", &target.triggered_by),
        ];

        for (field, list) in relations {
            for other in list.iter() {
                if !cfg.target.contains_key(other) {
                    return Err(BuilddagError::ConfigError(format!(
                        "target '{}' has unknown target '{}' in `{}`",
                        name, other, field
                    )));
                }
                if other == name {
                    return Err(BuilddagError::ConfigError(format!(
                        "target '{}' cannot reference itself in `{}`",
                        name, field
                    )));
                }
            }
        }
    }
    Ok(())
}

fn validate_target_actions(cfg: &RawConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        if target.action.is_some() && target.cmd.is_some() {
            return Err(BuilddagError::ConfigError(format!(
                "target '{}' sets both `action` and `cmd`; pick one",
                name
            )));
        }
        if let Some(cmd) = &target.cmd {
            if cmd.trim().is_empty() {
                return Err(BuilddagError::ConfigError(format!(
                    "target '{}' has an empty `cmd`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_templates(cfg: &RawConfigFile) -> Result<()> {
    let tools = &cfg.tools;
    let checks: [(&str, &str, &[&str]); 9] = [
        ("tools.restore", &tools.restore, restore::PLACEHOLDERS),
        ("tools.compile", &tools.compile, compile::PLACEHOLDERS),
        ("tools.test", &tools.test, test::PLACEHOLDERS),
        (
            "tools.test_coverage_args",
            &tools.test_coverage_args,
            test::COVERAGE_ARGS_PLACEHOLDERS,
        ),
        ("tools.source_link_args", &tools.source_link_args, &[]),
        ("tools.report", &tools.report, coverage::PLACEHOLDERS),
        (
            "tools.pack_descriptor",
            &tools.pack_descriptor,
            pack::DESCRIPTOR_PLACEHOLDERS,
        ),
        (
            "tools.pack_project",
            &tools.pack_project,
            pack::PROJECT_PLACEHOLDERS,
        ),
        ("paths.test_output", &cfg.paths.test_output, &["configuration"]),
    ];

    for (key, template, allowed) in checks {
        let unknown = unknown_placeholders(template, allowed);
        if !unknown.is_empty() {
            return Err(BuilddagError::ConfigError(format!(
                "[{}] uses unknown placeholder(s) {} (allowed: {})",
                key,
                unknown.join(", "),
                allowed.join(", ")
            )));
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: predecessor -> target, over every relation that
    // constrains order.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.target.keys() {
        graph.add_node(name.as_str());
    }

    for (name, target) in cfg.target.iter() {
        for dep in target.depends_on.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
        for trigger in target.triggered_by.iter() {
            graph.add_edge(trigger.as_str(), name.as_str(), ());
        }
        for prev in target.after.iter() {
            graph.add_edge(prev.as_str(), name.as_str(), ());
        }
        for next in target.before.iter() {
            graph.add_edge(name.as_str(), next.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(BuilddagError::DagCycle(format!(
                "involving target '{}'",
                node
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(src)?;
        ConfigFile::try_from(raw)
    }

    #[test]
    fn empty_file_gets_builtin_targets() {
        let cfg = parse("").unwrap();
        assert!(cfg.target.contains_key("Pack"));
        assert!(cfg.target.contains_key("Clean"));
    }

    #[test]
    fn before_relation_participates_in_cycle_check() {
        let err = parse(
            r#"
[build]
primary = "A"

[target.A]
before = ["B"]

[target.B]
before = ["A"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, BuilddagError::DagCycle(_)));
    }

    #[test]
    fn action_and_cmd_are_exclusive() {
        let err = parse(
            r#"
[build]
primary = "A"

[target.A]
action = "clean"
cmd = "echo hi"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, BuilddagError::ConfigError(msg) if msg.contains("both")));
    }

    #[test]
    fn unknown_primary_is_rejected() {
        let err = parse(
            r#"
[build]
primary = "Ship"

[target.A]
cmd = "echo A"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, BuilddagError::ConfigError(msg) if msg.contains("Ship")));
    }

    #[test]
    fn fixed_version_must_be_semver() {
        let err = parse(
            r#"
[version]
fixed = "1.2"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, BuilddagError::ConfigError(msg) if msg.contains("[version].fixed")));

        let cfg = parse("[version]\nfixed = \"1.2.0-rc.1\"\n").unwrap();
        assert_eq!(cfg.version.fixed.as_deref(), Some("1.2.0-rc.1"));
    }

    #[test]
    fn unknown_template_placeholder_is_rejected() {
        let err = parse(
            r#"
[tools]
restore = "nuget restore {soltuion}"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, BuilddagError::ConfigError(msg) if msg.contains("soltuion")));
    }
}
