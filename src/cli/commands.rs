use clap::Subcommand;

use super::autofill::AutofillArgs;
use super::config::ConfigArgs;
use super::fill::FillArgs;
use super::inspect::InspectArgs;
use super::match_cmd::MatchArgs;
use super::templates::TemplatesArgs;

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Manage stored templates
    Templates(TemplatesArgs),

    /// Score a page's form containers against a template without filling
    Match(MatchArgs),

    /// Run the full autofill flow against a page
    Autofill(AutofillArgs),

    /// Execute a fill plan directly
    Fill(FillArgs),

    /// Pick a container by pointer to import it as a template or fill it
    Inspect(InspectArgs),

    /// Manage SoulFill configuration
    Config(ConfigArgs),
}
