use anyhow::{anyhow, bail, Context, Result};
use bytes::Bytes;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod api;
mod config;
mod forms;
mod geo;
mod logging;
mod session;
#[cfg(test)]
mod test_utils;
mod upload;
mod views;

use crate::api::client::ApiClient;
use crate::api::http::HttpApiClient;
use crate::api::models::{
    BloodType, DistanceUnit, DocumentType, Event, EventType, SignInRequest, SignUpRequest,
    TshirtSize,
};
use crate::config::Config;
use crate::forms::event_draft::EventDraft;
use crate::forms::registration::RegistrationForm;
use crate::geo::http::HttpGeoDirectory;
use crate::session::geolocator::StaticGeolocator;
use crate::session::session::Session;
use crate::session::token::{FileTokenStore, TokenStore};
use crate::upload::pipeline::{FileToUpload, Uploader};
use crate::upload::transfer::HttpObjectTransfer;
use crate::views::detail::{DetailState, EventDetail};
use crate::views::listing::{EventListing, ListingFilters, LoadState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.toml",
        global = true
    )]
    config: String,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account and log in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with existing credentials
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Browse and manage events
    Events {
        #[command(subcommand)]
        command: EventsCommand,
    },
    /// Search city suggestions
    Locations {
        /// Free-text query, minimum length per configuration
        query: String,
    },
    /// Upload files through the two-phase pipeline
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Register for an event
    Register(RegisterArgs),
}

#[derive(Subcommand, Debug)]
enum EventsCommand {
    /// List events near you
    List {
        /// Filter by race type (wire name, e.g. trail_race)
        #[arg(long = "type")]
        event_type: Option<EventType>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// Filter by city; uses the city's coordinates instead of yours
        #[arg(long)]
        city: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one event by id
    Show { id: i64 },
    /// Create an event
    Create(CreateArgs),
    /// Delete an event you authored
    Delete { id: i64 },
}

#[derive(clap::Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    /// Event date, e.g. 2025-06-01
    #[arg(long)]
    date: String,
    /// Start time, e.g. 08:00
    #[arg(long)]
    time: String,
    #[arg(long)]
    price: f64,
    #[arg(long, default_value = "COP")]
    price_unit: String,
    #[arg(long)]
    distance: f64,
    #[arg(long)]
    distance_unit: DistanceUnit,
    #[arg(long = "type")]
    event_type: EventType,
    /// City query; the first suggestion is selected
    #[arg(long)]
    city: String,
    /// Cover image file
    #[arg(long)]
    cover: PathBuf,
    /// Organizer terms document
    #[arg(long)]
    terms: Option<PathBuf>,
    /// Secondary media files
    #[arg(long = "file")]
    files: Vec<PathBuf>,
    #[arg(long = "amenity")]
    amenities: Vec<String>,
    /// Offer a T-shirt at this price
    #[arg(long)]
    tshirt_price: Option<f64>,
}

#[derive(clap::Args, Debug)]
struct RegisterArgs {
    event_id: i64,
    #[arg(long)]
    document_type: DocumentType,
    #[arg(long)]
    document_number: String,
    #[arg(long)]
    document_country: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    /// Birth date, e.g. 1995-04-12
    #[arg(long)]
    birth_date: NaiveDate,
    #[arg(long)]
    health_service: String,
    #[arg(long)]
    blood_type: BloodType,
    #[arg(long)]
    country: String,
    #[arg(long)]
    department: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    emergency_name: String,
    #[arg(long)]
    emergency_phone: String,
    /// Opt in to the T-shirt upsell with this size
    #[arg(long)]
    tshirt_size: Option<TshirtSize>,
    /// Accept the organizer's terms document
    #[arg(long)]
    accept_organizer_terms: bool,
    /// Accept the platform terms and privacy policy
    #[arg(long)]
    accept_platform_terms: bool,
}

struct App {
    config: Config,
    token_store: Arc<FileTokenStore>,
    api: Arc<HttpApiClient>,
    session: Session,
}

impl App {
    async fn new(config: Config) -> Result<Self> {
        let token_store = Arc::new(FileTokenStore::new(&config.session.token_dir));

        // Ctrl-C abandons in-flight calls instead of killing mid-request
        let cancel = CancellationToken::new();
        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupt received, cancelling in-flight requests");
                    cancel.cancel();
                }
            });
        }

        let api = Arc::new(
            HttpApiClient::new(
                &config.api.base_url,
                token_store.clone() as Arc<dyn TokenStore>,
            )
            .with_cancellation(cancel),
        );
        let geolocator = Arc::new(StaticGeolocator::new(config.session.device_position));
        let session = Session::init(token_store.clone(), geolocator).await?;
        Ok(App {
            config,
            token_store,
            api,
            session,
        })
    }

    async fn require_token(&self) -> Result<String> {
        self.token_store
            .load()
            .await?
            .ok_or_else(|| anyhow!("Debes iniciar sesión para continuar"))
    }

    fn uploader(&self) -> Arc<Uploader> {
        Arc::new(Uploader::new(
            self.api.clone(),
            Arc::new(HttpObjectTransfer::new()),
            self.token_store.clone(),
            self.config.upload.max_concurrent,
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    let _log_guard = logging::init_logging(config.logging.as_ref(), cli.verbose)?;

    info!("Runnify v{}", env!("CARGO_PKG_VERSION"));

    let app = App::new(config).await?;

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => signup(&app, name, email, password).await,
        Commands::Login { email, password } => login(&app, email, password).await,
        Commands::Logout => logout(&app).await,
        Commands::Events { command } => match command {
            EventsCommand::List {
                event_type,
                year,
                month,
                city,
                limit,
                page,
            } => list_events(&app, event_type, year, month, city, limit, page).await,
            EventsCommand::Show { id } => show_event(&app, id).await,
            EventsCommand::Create(args) => create_event(&app, args).await,
            EventsCommand::Delete { id } => delete_event(&app, id).await,
        },
        Commands::Locations { query } => search_locations(&app, &query).await,
        Commands::Upload { files } => upload_files(&app, files).await,
        Commands::Register(args) => register(&app, args).await,
    }
}

async fn signup(app: &App, name: String, email: String, password: String) -> Result<()> {
    let response = app
        .api
        .sign_up(&SignUpRequest {
            name,
            email: email.clone(),
            password,
        })
        .await?;
    app.session.login(&response.token).await?;
    println!("Cuenta creada, sesión iniciada como {email}");
    Ok(())
}

async fn login(app: &App, email: String, password: String) -> Result<()> {
    let response = app
        .api
        .sign_in(&SignInRequest {
            email: email.clone(),
            password,
        })
        .await?;
    app.session.login(&response.token).await?;
    app.session.refresh_user(&app.api).await;
    match app.session.user() {
        Some(user) => println!("Sesión iniciada como {} <{}>", user.name, user.email),
        None => println!("Sesión iniciada como {email}"),
    }
    Ok(())
}

async fn logout(app: &App) -> Result<()> {
    app.session.logout().await?;
    println!("Sesión cerrada");
    Ok(())
}

fn print_event_line(event: &Event) {
    println!(
        "{:>5}  {}  {:>8}  {}  {}",
        event.id.unwrap_or_default(),
        event.date.format("%Y-%m-%d %H:%M"),
        event.distance_label(),
        event.city,
        event.title
    );
}

async fn list_events(
    app: &App,
    event_type: Option<EventType>,
    year: Option<i32>,
    month: Option<u32>,
    city: Option<String>,
    limit: u32,
    page: u32,
) -> Result<()> {
    let city = match city {
        Some(query) => {
            let token = app.require_token().await?;
            let suggestions = app.api.search_locations(&query, &token).await?;
            let location = suggestions
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("No se encontró la ciudad: {query}"))?;
            println!("Filtrando por {}", location.name);
            Some(location)
        }
        None => None,
    };

    let filters = ListingFilters {
        event_type,
        year,
        month,
        city,
    };
    let mut listing = EventListing::new(limit);
    listing.load(app.api.as_ref(), &app.session, &filters, page).await?;

    match listing.state() {
        LoadState::Empty => println!("No hay eventos disponibles"),
        LoadState::Loaded(events) => {
            for event in events {
                print_event_line(event);
            }
            println!(
                "Página {} — {} de {} eventos",
                listing.page(),
                events.len(),
                listing.total()
            );
        }
        LoadState::Loading => {}
    }
    Ok(())
}

async fn show_event(app: &App, id: i64) -> Result<()> {
    let mut detail = EventDetail::new();
    detail.load(app.api.as_ref(), id).await?;

    match detail.state() {
        DetailState::NotFound => bail!("No se encontró el evento {id}"),
        DetailState::Loaded(event) => {
            println!("{}", event.title);
            println!("{}", event.description);
            println!("Tipo:      {}", event.event_type.label());
            println!("Fecha:     {}", event.date.format("%Y-%m-%d %H:%M"));
            println!("Distancia: {}", event.distance_label());
            println!("Ciudad:    {}", event.city);
            println!("Precio:    {} {}", event.price, event.price_unit);
            if event.offers_tshirt() {
                if let Some(price) = event.tshirt_price {
                    println!("Camiseta:  {} {}", price, event.price_unit);
                }
            }
            if let Some(terms) = &event.terms_url {
                println!("Términos:  {terms}");
            }
            for amenity in &event.amenities {
                println!("  - {amenity}");
            }
        }
        DetailState::Loading => {}
    }
    Ok(())
}

fn content_type_of(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

async fn read_file(path: &Path) -> Result<FileToUpload> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Invalid file name: {}", path.display()))?
        .to_string();
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(FileToUpload {
        file_name,
        content_type: content_type_of(path).to_string(),
        data: Bytes::from(data),
    })
}

async fn create_event(app: &App, args: CreateArgs) -> Result<()> {
    let token = app.require_token().await?;
    let uploader = app.uploader();

    let mut draft = EventDraft::new(app.config.search.min_query_len);
    draft.title = args.title;
    draft.description = args.description;
    draft.date = args.date;
    draft.start_time = args.time;
    draft.price = Some(args.price);
    draft.price_unit = args.price_unit;
    draft.distance = Some(args.distance);
    draft.distance_unit = Some(args.distance_unit);
    draft.event_type = Some(args.event_type);
    draft.amenities = args.amenities;
    if let Some(price) = args.tshirt_price {
        draft.include_tshirt = true;
        draft.tshirt_price = Some(price);
    }

    let suggestions = draft
        .search_cities(app.api.as_ref(), &token, &args.city)
        .await?;
    let location = suggestions
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No se encontró la ciudad: {}", args.city))?;
    println!("Ciudad seleccionada: {}", location.name);
    draft.select_city(&location);

    let cover = uploader.upload(&read_file(&args.cover).await?).await?;
    draft.set_cover(&cover);

    if let Some(terms) = &args.terms {
        let uploaded = uploader.upload(&read_file(terms).await?).await?;
        draft.set_terms(&uploaded);
    }

    if !args.files.is_empty() {
        let mut to_upload = Vec::with_capacity(args.files.len());
        for path in &args.files {
            to_upload.push(read_file(path).await?);
        }
        // A failed sibling upload is reported but does not abort the rest
        for outcome in uploader.upload_all(to_upload).await {
            match outcome {
                Ok(uploaded) => draft.add_file(&uploaded),
                Err(e) => eprintln!("{e}"),
            }
        }
    }

    let event = draft.submit(app.api.as_ref(), &app.token_store).await?;
    println!(
        "Evento creado: {} (id {})",
        event.title,
        event.id.unwrap_or_default()
    );
    Ok(())
}

async fn delete_event(app: &App, id: i64) -> Result<()> {
    let token = app.require_token().await?;
    app.api.delete_event(id, &token).await?;
    println!("Evento {id} eliminado");
    Ok(())
}

async fn search_locations(app: &App, query: &str) -> Result<()> {
    if query.chars().count() < app.config.search.min_query_len {
        bail!(
            "La búsqueda necesita al menos {} caracteres",
            app.config.search.min_query_len
        );
    }
    let token = app.require_token().await?;
    let locations = app.api.search_locations(query, &token).await?;
    if locations.is_empty() {
        println!("Sin resultados para: {query}");
        return Ok(());
    }
    for location in locations {
        println!(
            "{}  [{}, {}]",
            location.name, location.coordinates[1], location.coordinates[0]
        );
    }
    Ok(())
}

async fn upload_files(app: &App, paths: Vec<PathBuf>) -> Result<()> {
    let uploader = app.uploader();
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        files.push(read_file(path).await?);
    }

    let mut failures = 0;
    for outcome in uploader.upload_all(files).await {
        match outcome {
            Ok(uploaded) => println!("{}  {}", uploaded.file_name, uploaded.file_url),
            Err(e) => {
                failures += 1;
                eprintln!("{e}");
            }
        }
    }
    if failures > 0 {
        bail!("{failures} archivo(s) no se pudieron subir");
    }
    Ok(())
}

async fn register(app: &App, args: RegisterArgs) -> Result<()> {
    let mut detail = EventDetail::new();
    detail.load(app.api.as_ref(), args.event_id).await?;
    let event = match detail.state() {
        DetailState::Loaded(event) => event.as_ref().clone(),
        _ => bail!("No se encontró el evento {}", args.event_id),
    };

    let directory = HttpGeoDirectory::new(&app.config.geo.base_url);
    let mut form = RegistrationForm::new(&event);
    form.document_type = Some(args.document_type);
    form.document_number = args.document_number;
    form.document_country = args.document_country;
    form.first_name = args.first_name;
    form.last_name = args.last_name;
    form.email = args.email;
    form.phone = args.phone;
    form.set_birth_date(args.birth_date);
    form.health_service = args.health_service;
    form.blood_type = Some(args.blood_type);
    form.emergency_contact_name = args.emergency_name;
    form.emergency_contact_phone = args.emergency_phone;
    form.accepts_organizer_terms = args.accept_organizer_terms;
    form.accepts_platform_terms = args.accept_platform_terms;
    if let Some(size) = args.tshirt_size {
        form.wants_tshirt = true;
        form.tshirt_size = Some(size);
    }

    form.set_country(&directory, &args.country).await?;
    if !form.departments().contains(&args.department) {
        bail!(
            "El departamento {} no pertenece a {}",
            args.department,
            args.country
        );
    }
    form.set_department(&directory, &args.department).await?;
    if !form.cities().contains(&args.city) {
        bail!(
            "La ciudad {} no pertenece a {}",
            args.city,
            args.department
        );
    }
    form.set_city(&args.city);

    if let Some(advisory) = form.minor_advisory(Utc::now().date_naive()) {
        println!("Aviso: {advisory}");
    }

    form.submit(app.api.as_ref(), &app.token_store).await?;
    println!("Inscripción enviada para {}", event.title);
    Ok(())
}
