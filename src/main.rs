use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
mod auth;
mod storage;
use credlock::{ContainerInfo, Credentials, DEFAULT_ITERATIONS, Format, KdfParams, Options};
use std::path::PathBuf;
use storage::{Storage, locked_path, unlocked_path};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// salt | nonce | ciphertext, compatible with existing .locked files
    Raw,
    /// Tagged header that records the iteration count
    V1,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Raw => Format::Raw,
            FormatArg::V1 => Format::V1,
        }
    }
}

#[derive(Debug, clap::Args)]
struct ContainerArgs {
    /// Container layout
    #[arg(long, value_enum, default_value_t = FormatArg::Raw)]
    format: FormatArg,

    /// PBKDF2 iterations (ignored when unlocking v1 containers)
    #[arg(long, env = "CREDLOCK_ITERATIONS", default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,
}

impl ContainerArgs {
    fn to_options(&self) -> Result<Options> {
        Ok(Options {
            format: self.format.into(),
            kdf: KdfParams::new(self.iterations)?,
        })
    }
}

#[derive(Debug, clap::Args)]
struct CredentialArgs {
    /// Full name of the document owner (prompted if missing)
    #[arg(long, env = "CREDLOCK_NAME", hide_env_values = true)]
    name: Option<String>,

    /// Date of birth as YYYY-MM-DD (prompted if missing)
    #[arg(long, env = "CREDLOCK_DOB", hide_env_values = true)]
    dob: Option<String>,
}

impl CredentialArgs {
    fn read(self, confirm_pin: bool) -> Result<Credentials> {
        let name = match self.name {
            Some(name) => Zeroizing::new(name),
            None => auth::read_field("Full name")?,
        };
        let dob = match self.dob {
            Some(dob) => Zeroizing::new(dob),
            None => auth::read_field("Date of birth")?,
        };
        let pin = if confirm_pin {
            auth::read_new_pin_with_confirmation()?
        } else {
            auth::read_pin()?
        };

        Ok(Credentials::new(&name, &dob, &pin)?)
    }
}

#[derive(Debug, Parser)]
#[command(name = "credlock")]
#[command(
    version,
    about = "Lock documents with a key derived from name, date of birth and PIN."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts a document into a .locked container
    #[command(arg_required_else_help = true)]
    Lock {
        input: PathBuf,

        /// Output path (default: report.pdf -> report.locked)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(long, default_value_t = false)]
        force: bool,

        #[command(flatten)]
        container: ContainerArgs,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Decrypts a .locked container
    #[command(arg_required_else_help = true)]
    Unlock {
        input: PathBuf,

        /// Output path (default: report.locked -> report.pdf)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(long, default_value_t = false)]
        force: bool,

        #[command(flatten)]
        container: ContainerArgs,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Shows the layout of a container without decrypting it
    #[command(arg_required_else_help = true)]
    Inspect {
        input: PathBuf,

        /// Container layout
        #[arg(long, value_enum, default_value_t = FormatArg::Raw)]
        format: FormatArg,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn init_logging() {
    // RUST_LOG=debug shows sizes and parameters, never credentials.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Unable to set global default subscriber");
    }
}

fn output_storage(path: PathBuf, force: bool) -> Result<Storage> {
    let storage = Storage::new(path);
    if storage.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            storage.path().display()
        );
    }
    Ok(storage)
}

fn print_info(info: &ContainerInfo) {
    let version = info
        .version
        .map_or_else(|| "-".to_string(), |v| v.to_string());
    let iterations = info
        .iterations
        .map_or_else(|| "not recorded".to_string(), |n| n.to_string());
    let plaintext = info
        .plaintext_len
        .map_or_else(|| "none (no room for tag)".to_string(), |n| format!("{n} bytes"));

    let rows = [
        ("Format", format!("{:?}", info.format).to_lowercase()),
        ("Version", version),
        ("Iterations", iterations),
        ("Salt", info.salt.clone()),
        ("Nonce", info.nonce.clone()),
        ("Ciphertext", format!("{} bytes", info.ciphertext_len)),
        ("Plaintext", plaintext),
    ];

    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in rows {
        println!("{key:<width$}  {value}");
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging();

    match args.command {
        Commands::Lock {
            input,
            output,
            force,
            container,
            credentials,
        } => {
            let options = container.to_options()?;
            let target = output_storage(output.unwrap_or_else(|| locked_path(&input)), force)?;
            let plaintext = Zeroizing::new(Storage::new(input.clone()).load()?);

            let credentials = credentials.read(true)?;
            let locked = credlock::lock_with(&plaintext, &credentials, &options)?;
            drop(credentials);

            target.save(&locked)?;
            info!(bytes = locked.len(), "container written");
            println!("locked {} -> {}", input.display(), target.path().display());
        }
        Commands::Unlock {
            input,
            output,
            force,
            container,
            credentials,
        } => {
            let options = container.to_options()?;
            let target = output_storage(output.unwrap_or_else(|| unlocked_path(&input)), force)?;
            let data = Storage::new(input.clone()).load()?;

            let credentials = credentials.read(false)?;
            let plaintext = credlock::unlock_with(&data, &credentials, &options)?;
            drop(credentials);

            target.save(&plaintext)?;
            info!(bytes = plaintext.len(), "document written");
            println!("unlocked {} -> {}", input.display(), target.path().display());
        }
        Commands::Inspect {
            input,
            format,
            json,
        } => {
            let data = Storage::new(input).load()?;
            let info = credlock::inspect(&data, format.into())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_info(&info);
            }
        }
    }

    Ok(())
}
