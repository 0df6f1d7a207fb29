//! File templates for generated packages.
//!
//! Rendering is pure: a descriptor and a [`TemplateContext`] go in, a list
//! of relative paths with their exact contents comes out. Writing them is
//! the caller's business.

use serde_json::{json, Map, Value};

use crate::core::descriptor::{
    scoped_name, EsShimDescriptor, PackageDescriptor, SingleFileDescriptor, DEFAULT_NODE_VERSION,
};
use crate::core::manifest::to_json_pretty;

/// Everything a package needs from outside its own descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    /// npm scope (e.g. `@nolyfill`)
    pub scope: String,
    /// Scoped name of the runtime helper package (e.g. `@nolyfill/shared`)
    pub shared_package: String,
    /// Version stamped into every `package.json`
    pub version: String,
    /// git URL of the repository
    pub repository: String,
    pub license: String,
    /// Packages directory relative to the repository root
    pub packages_dir: String,
    /// `engines.node` for descriptors that do not specify one
    pub default_node: String,
}

impl TemplateContext {
    /// Context with the stock nolyfill settings.
    pub fn new(version: impl Into<String>) -> Self {
        TemplateContext {
            scope: "@nolyfill".to_string(),
            shared_package: "@nolyfill/shared".to_string(),
            version: version.into(),
            repository: "https://github.com/SukkaW/nolyfill".to_string(),
            license: "MIT".to_string(),
            packages_dir: "packages".to_string(),
            default_node: DEFAULT_NODE_VERSION.to_string(),
        }
    }
}

/// One file of a rendered package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Path relative to the package directory
    pub path: &'static str,
    pub content: String,
}

impl RenderedFile {
    fn new(path: &'static str, content: String) -> Self {
        RenderedFile { path, content }
    }
}

/// Render every file of a package. Manual descriptors render nothing.
pub fn render(descriptor: &PackageDescriptor, ctx: &TemplateContext) -> Option<Vec<RenderedFile>> {
    match descriptor {
        PackageDescriptor::EsShim(d) => Some(render_es_shim(d, ctx)),
        PackageDescriptor::SingleFile(d) => Some(render_single_file(d, ctx)),
        PackageDescriptor::Manual(_) => None,
    }
}

fn render_es_shim(d: &EsShimDescriptor, ctx: &TemplateContext) -> Vec<RenderedFile> {
    let imp = &d.implementation;
    let accessor = format!("'use strict';\nmodule.exports = () => {};\n", imp);

    let mut dependencies = Map::new();
    dependencies.insert(ctx.shared_package.clone(), json!("workspace:*"));
    for (name, spec) in &d.dependencies {
        dependencies.insert(name.clone(), json!(spec));
    }

    vec![
        RenderedFile::new(
            "implementation.js",
            format!("'use strict';\nmodule.exports = {};\n", imp),
        ),
        RenderedFile::new("polyfill.js", accessor.clone()),
        RenderedFile::new("shim.js", accessor),
        RenderedFile::new("auto.js", "'use strict';\n/* noop */\n".to_string()),
        RenderedFile::new("index.js", render_es_shim_index(d, &ctx.shared_package)),
        RenderedFile::new(
            "package.json",
            render_package_json(&d.name, dependencies, d.node.as_deref(), ctx),
        ),
    ]
}

/// `index.js` of an es-shim package.
///
/// Prototype methods are uncurried so the receiver becomes the first
/// argument; `bind_to` then pins the receiver for good.
pub fn render_es_shim_index(d: &EsShimDescriptor, shared_package: &str) -> String {
    let import = if d.is_static {
        format!("const {{ makeEsShim }} = require('{}');", shared_package)
    } else {
        format!(
            "const {{ uncurryThis, makeEsShim }} = require('{}');",
            shared_package
        )
    };

    let callable = if d.is_static { "impl" } else { "uncurryThis(impl)" };
    let bound = match &d.bind_to {
        Some(target) => format!("{}.bind({})", callable, target),
        None => callable.to_string(),
    };

    [
        "'use strict';".to_string(),
        import,
        format!("const impl = {};", d.implementation),
        format!("const bound = {};", bound),
        "makeEsShim(bound, impl);".to_string(),
        "module.exports = bound;".to_string(),
        String::new(),
    ]
    .join("\n")
}

fn render_single_file(d: &SingleFileDescriptor, ctx: &TemplateContext) -> Vec<RenderedFile> {
    let dependencies = d
        .dependencies
        .iter()
        .map(|(name, spec)| (name.clone(), json!(spec)))
        .collect();

    vec![
        RenderedFile::new("index.js", format!("'use strict';\n{}\n", d.source)),
        RenderedFile::new(
            "package.json",
            render_package_json(&d.name, dependencies, d.node.as_deref(), ctx),
        ),
    ]
}

fn render_package_json(
    name: &str,
    dependencies: Map<String, Value>,
    node: Option<&str>,
    ctx: &TemplateContext,
) -> String {
    let manifest = json!({
        "name": scoped_name(&ctx.scope, name),
        "version": ctx.version,
        "repository": {
            "type": "git",
            "url": ctx.repository,
            "directory": format!("{}/{}", ctx.packages_dir, name),
        },
        "main": "./index.js",
        "license": ctx.license,
        "files": ["*.js"],
        "scripts": {},
        "dependencies": Value::Object(dependencies),
        "engines": {
            "node": node.unwrap_or(&ctx.default_node),
        },
    });

    to_json_pretty(&manifest)
}
