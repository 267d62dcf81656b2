//! `registries` subcommand: print the registry tree.

use edithost_core::{with_registries, Component, InjectedProps, MetaRegistry, RegistryTree};

use crate::cli::OutputFormat;
use crate::host::Host;

/// Renders the registry tree it is injected with.
pub(crate) struct RegistryOverview;

impl Component for RegistryOverview {
    type Props = InjectedProps<OutputFormat, Vec<RegistryTree>>;
    type Output = Result<String, serde_json::Error>;

    fn name(&self) -> &str {
        "RegistryOverview"
    }

    fn render(&self, props: Self::Props) -> Self::Output {
        match props.own {
            OutputFormat::Json => serde_json::to_string_pretty(&props.derived),
            OutputFormat::Table => Ok(render_table(&props.derived)),
        }
    }
}

fn render_table(tree: &[RegistryTree]) -> String {
    let mut out = format!("{:<40} {:>8}  {}\n", "REGISTRY", "ENTRIES", "DESCRIPTION");
    out.push_str(&"-".repeat(80));
    out.push('\n');
    push_rows(&mut out, tree, "");
    out
}

fn push_rows(out: &mut String, tree: &[RegistryTree], prefix: &str) {
    for node in tree {
        let path = if prefix.is_empty() {
            node.key.clone()
        } else {
            format!("{}/{}", prefix, node.key)
        };
        out.push_str(&format!("{:<40} {:>8}  {}\n", path, node.entries, node.summary));
        push_rows(out, &node.children, &path);
    }
}

/// Print the registry tree.
pub(crate) fn registries(host: &Host, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let overview = with_registries(MetaRegistry::describe).wrap(RegistryOverview);
    let context = host.injection_context();

    match overview.render(Some(&context), format) {
        Some(rendered) => print!("{}", rendered?),
        None => println!("No registries available."),
    }
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}
