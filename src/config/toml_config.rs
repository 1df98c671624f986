use crate::adapters::tabular::LayoutHeaders;
use crate::core::injector::DEFAULT_DEFINITION_PREFIX;
use crate::domain::model::{ParamValue, ParameterSet, PlateGeometry};
use crate::utils::error::{AssemblyError, Result};
use crate::utils::validation::{
    validate_identifier, validate_non_empty_string, validate_range, Validate,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Run settings read from a TOML file. Every section is optional; an empty
/// file gives a standard 96-well plate and the default column names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub plate: PlateConfig,
    pub parts: PartsConfig,
    pub template: TemplateConfig,
    pub output: LayoutHeaders,
    pub parameters: IndexMap<String, toml::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    pub rows: usize,
    pub columns: u16,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self { rows: 8, columns: 12 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartsConfig {
    pub column_a: String,
    pub column_b: String,
}

impl Default for PartsConfig {
    fn default() -> Self {
        Self {
            column_a: "Promoters".to_string(),
            column_b: "3UTRs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub definition_prefixes: Vec<String>,
    pub count_parameter: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            definition_prefixes: vec![DEFAULT_DEFINITION_PREFIX.to_string()],
            count_parameter: "prom_utr".to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssemblyError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AssemblyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PLATE_COLUMNS})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AssemblyError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn geometry(&self) -> Result<PlateGeometry> {
        PlateGeometry::new(self.plate.rows, self.plate.columns)
    }

    /// The count tuple first, then any extra `[parameters]` in file order.
    pub fn parameter_set(&self, count_a: usize, count_b: usize) -> Result<ParameterSet> {
        let mut parameters = ParameterSet::new();
        parameters.insert(
            self.template.count_parameter.clone(),
            ParamValue::Tuple(vec![count_a.into(), count_b.into()]),
        );

        for (name, value) in &self.parameters {
            parameters.insert(name.clone(), to_param_value(name, value)?);
        }
        Ok(parameters)
    }

    pub fn validate_config(&self) -> Result<()> {
        self.geometry()?;
        validate_range("plate.columns", self.plate.columns, 1, 99)?;

        validate_non_empty_string("parts.column_a", &self.parts.column_a)?;
        validate_non_empty_string("parts.column_b", &self.parts.column_b)?;

        if self.template.definition_prefixes.is_empty() {
            return Err(AssemblyError::ConfigValidationError {
                field: "template.definition_prefixes".to_string(),
                message: "At least one definition prefix is required".to_string(),
            });
        }
        for prefix in &self.template.definition_prefixes {
            validate_non_empty_string("template.definition_prefixes", prefix)?;
        }

        validate_identifier("template.count_parameter", &self.template.count_parameter)?;
        for (name, value) in &self.parameters {
            validate_identifier("parameters", name)?;
            if *name == self.template.count_parameter {
                return Err(AssemblyError::InvalidConfigValueError {
                    field: "parameters".to_string(),
                    value: name.clone(),
                    reason: "Name is already used by template.count_parameter".to_string(),
                });
            }
            to_param_value(name, value)?;
        }

        validate_non_empty_string("output.coordinate", &self.output.coordinate)?;
        validate_non_empty_string("output.part_a", &self.output.part_a)?;
        validate_non_empty_string("output.part_b", &self.output.part_b)?;

        Ok(())
    }
}

fn to_param_value(name: &str, value: &toml::Value) -> Result<ParamValue> {
    match value {
        toml::Value::Integer(i) => Ok(ParamValue::Integer(*i)),
        toml::Value::Float(f) if f.is_finite() => Ok(ParamValue::Float(*f)),
        toml::Value::Float(f) => Err(AssemblyError::InvalidConfigValueError {
            field: format!("parameters.{}", name),
            value: f.to_string(),
            reason: "Floats must be finite".to_string(),
        }),
        toml::Value::String(s) => Ok(ParamValue::Text(s.clone())),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| to_param_value(name, item))
            .collect::<Result<Vec<_>>>()
            .map(ParamValue::Tuple),
        other => Err(AssemblyError::InvalidConfigValueError {
            field: format!("parameters.{}", name),
            value: other.to_string(),
            reason: "Only integers, floats, strings and arrays of those are supported".to_string(),
        }),
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
