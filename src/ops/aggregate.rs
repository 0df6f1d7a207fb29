//! The CLI data module.
//!
//! A TypeScript module listing every shimmed package and the size of the
//! original it replaces. It is consumed by the `nolyfill` CLI package.

use serde_json::Value;

use crate::sources::enrich::{size_table, SizeReport};

/// First line of every generated data module.
pub const DATA_MODULE_BANNER: &str = "/* Generated by shimgen */";

/// Render the data module. The output has no trailing newline.
pub fn render_data_module(sorted_names: &[String], sizes: &[SizeReport]) -> String {
    let names = Value::Array(sorted_names.iter().cloned().map(Value::String).collect());

    format!(
        "{}\n/* eslint-disable */\nexport const allPackages = {:#};\n\
         export const packageSize: Record<string, {{ publish: number, install: number }}> = {:#};",
        DATA_MODULE_BANNER,
        names,
        size_table(sizes),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_module_exact_output() {
        let names = vec!["has".to_string(), "object.assign".to_string()];
        let sizes = vec![
            SizeReport {
                name: "has".into(),
                publish_size: 1200,
                install_size: 3400,
            },
            SizeReport {
                name: "object.assign".into(),
                publish_size: 10,
                install_size: 20,
            },
        ];

        assert_eq!(
            render_data_module(&names, &sizes),
            r#"/* Generated by shimgen */
/* eslint-disable */
export const allPackages = [
  "has",
  "object.assign"
];
export const packageSize: Record<string, { publish: number, install: number }> = {
  "has": {
    "publish": 1200,
    "install": 3400
  },
  "object.assign": {
    "publish": 10,
    "install": 20
  }
};"#
        );
    }

    #[test]
    fn test_data_module_empty() {
        let module = render_data_module(&[], &[]);
        assert!(module.ends_with("export const allPackages = [];\nexport const packageSize: Record<string, { publish: number, install: number }> = {};"));
    }
}
