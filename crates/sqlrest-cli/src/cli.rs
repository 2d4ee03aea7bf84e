use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};
use sqlrest_core::Renderer;

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use a profile other than the default one
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    /// Set proxy
    #[arg(required = false, long, short = 'P', global = true)]
    pub proxy: Option<String>,

    /// Set request headers (`Name: value`)
    #[arg(required = false, long, short = 'H', global = true)]
    pub header: Option<Vec<String>>,

    /// Set user agent
    #[arg(required = false, long, short = 'A', global = true)]
    pub user_agent: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RenderArg {
    Json,
    Xml,
    Csv,
}

impl From<RenderArg> for Renderer {
    fn from(value: RenderArg) -> Self {
        match value {
            RenderArg::Json => Renderer::Json,
            RenderArg::Xml => Renderer::Xml,
            RenderArg::Csv => Renderer::Csv,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective configuration
    Config {
        /// Write a documented default configuration file instead
        #[arg(required = false, long)]
        init: bool,
    },

    /// List rows of a table, or the tables of a schema (`schema.`)
    #[command(arg_required_else_help = true)]
    #[clap(name = "list", visible_alias = "ls")]
    List {
        /// Table as `schema.table` or `table`
        table: String,

        /// Page number
        #[arg(required = false, long)]
        page: Option<u64>,

        /// Rows per page
        #[arg(required = false, long)]
        page_size: Option<u64>,

        /// Columns to return
        #[arg(required = false, short, long, value_delimiter = ',')]
        select: Vec<String>,

        /// Sort fields; prefix with `-` for descending
        #[arg(required = false, short, long, value_delimiter = ',', allow_hyphen_values = true)]
        order: Vec<String>,

        /// Filters as `field=value` or `field=$op.value`
        #[arg(required = false, short, long = "where")]
        filters: Vec<String>,

        /// Count rows instead of returning them
        #[arg(required = false, long)]
        count: bool,

        /// Response rendering
        #[arg(required = false, short, long, value_enum)]
        renderer: Option<RenderArg>,
    },

    /// Show table and column metadata
    #[command(arg_required_else_help = true)]
    Show {
        /// Table as `schema.table` or `table`
        table: String,
    },

    /// Export a table
    #[command(arg_required_else_help = true)]
    Export {
        /// Table as `schema.table` or `table`
        table: String,

        /// Export options as a JSON object
        #[arg(required = false, short, long)]
        data: Option<String>,

        /// Write the export to a file instead of stdout
        #[arg(required = false, short, long, value_hint = ValueHint::FilePath)]
        output: Option<String>,
    },

    /// Run a stored query
    #[command(arg_required_else_help = true)]
    Query {
        /// Script as `path.script`
        script: String,

        /// Template parameters as `key=value`
        #[arg(required = false, long = "param")]
        params: Vec<String>,

        /// Run the export variant of the query
        #[arg(required = false, long)]
        export: bool,

        /// Write an export to a file instead of stdout
        #[arg(required = false, short, long, value_hint = ValueHint::FilePath)]
        output: Option<String>,
    },

    /// Insert one row, or many when `--data` is a JSON array
    #[command(arg_required_else_help = true)]
    Insert {
        /// Table as `schema.table` or `table`
        table: String,

        /// Row data as JSON
        #[arg(required = true, short, long)]
        data: String,
    },

    /// Update rows matching the filters
    #[command(arg_required_else_help = true)]
    Update {
        /// Table as `schema.table` or `table`
        table: String,

        /// Changes as a JSON object
        #[arg(required = true, short, long)]
        data: String,

        /// Filters as `field=value` or `field=$op.value`
        #[arg(required = false, short, long = "where")]
        filters: Vec<String>,
    },

    /// Delete rows matching the filters
    #[command(arg_required_else_help = true)]
    Delete {
        /// Table as `schema.table` or `table`
        table: String,

        /// Filters as `field=value` or `field=$op.value`
        #[arg(required = true, short, long = "where")]
        filters: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_list() {
        let args = Args::parse_from([
            "sqlrest",
            "-v",
            "list",
            "public.products",
            "--page",
            "2",
            "--order",
            "-price,name",
            "--where",
            "price=$gt.10",
            "-r",
            "csv",
        ]);
        assert_eq!(args.verbose, 1);
        match args.command {
            Commands::List {
                table,
                page,
                order,
                filters,
                renderer,
                ..
            } => {
                assert_eq!(table, "public.products");
                assert_eq!(page, Some(2));
                assert_eq!(order, vec!["-price", "name"]);
                assert_eq!(filters, vec!["price=$gt.10"]);
                assert!(matches!(renderer, Some(RenderArg::Csv)));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_delete_requires_filter() {
        let result = Args::try_parse_from(["sqlrest", "delete", "public.products"]);
        assert!(result.is_err());
    }
}
