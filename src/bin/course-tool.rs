//! Course file command-line tool
//!
//! Inspects, converts and renders course files.
//!
//! ## Commands
//!
//! - `info` - Display course metadata and record counts
//! - `decode` - Dump a course as JSON
//! - `encode` - Build a container from a JSON course
//! - `convert` - Re-seal a course in another container shape
//! - `render` - Write one PNG per area
//! - `palette` - Reduce a screenshot to an indexed tile grid
//! - `validate` - Check a course file (exit codes for scripting)
//! - `batch` - Decode every course file in a directory
//! - `names` - List or look up enumeration names

use clap::{Parser, Subcommand, ValueEnum};
use course_codec::config::Overrides;
use course_codec::enums::EnumDomain;
use course_codec::palette::{self, PaletteMode};
use course_codec::{raster, Area, Config, ContainerCodec, ContainerFormat, Level, PLAINTEXT_SIZE};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Course file inspector, converter and renderer
#[derive(Parser)]
#[command(name = "course-tool")]
#[command(about = "Course file inspector, converter and renderer", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Course key as 32 hex digits (overrides config and COURSE_KEY)
    #[arg(long, global = true)]
    key: Option<String>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display course information
    Info {
        /// Path to the course file
        file: PathBuf,
        /// Container shape (inferred from the extension if omitted)
        #[arg(short, long)]
        format: Option<ContainerFormat>,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// Dump a course as JSON
    Decode {
        /// Path to the course file
        file: PathBuf,
        /// Container shape (inferred from the extension if omitted)
        #[arg(short, long)]
        format: Option<ContainerFormat>,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a container from a JSON course
    Encode {
        /// Path to the JSON course
        file: PathBuf,
        /// Output container path
        #[arg(short, long)]
        output: PathBuf,
        /// Container shape (inferred from the output extension if omitted)
        #[arg(short, long)]
        format: Option<ContainerFormat>,
    },
    /// Re-seal a course in another container shape
    Convert {
        /// Input course file
        input: PathBuf,
        /// Output course file
        output: PathBuf,
        /// Input shape (inferred from the extension if omitted)
        #[arg(long)]
        from: Option<ContainerFormat>,
        /// Output shape (inferred from the extension if omitted)
        #[arg(long)]
        to: Option<ContainerFormat>,
    },
    /// Render each area to a PNG
    Render {
        /// Path to the course file
        file: PathBuf,
        /// Container shape (inferred from the extension if omitted)
        #[arg(short, long)]
        format: Option<ContainerFormat>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Pixels per tile (overrides config)
        #[arg(short, long)]
        scale: Option<u32>,
    },
    /// Reduce a screenshot to an indexed tile grid
    Palette {
        /// Path to a PNG or JPEG screenshot
        screenshot: PathBuf,
        /// Course file to take the theme from
        #[arg(short, long)]
        level: Option<PathBuf>,
        /// Grid contents: index, preview
        #[arg(short, long, default_value = "index")]
        mode: PaletteMode,
        /// Cell edge in pixels (overrides config)
        #[arg(long)]
        cell_size: Option<u32>,
        /// Clustering tolerance (overrides config)
        #[arg(long)]
        tolerance: Option<f64>,
        /// Write the grid as a PNG here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the grid as JSON here
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Validate a course file
    Validate {
        /// Path to the course file
        file: PathBuf,
        /// Container shape (inferred from the extension if omitted)
        #[arg(short, long)]
        format: Option<ContainerFormat>,
        /// Print every check
        #[arg(short, long)]
        details: bool,
    },
    /// Decode every course file in a directory
    Batch {
        /// Directory containing course files
        directory: PathBuf,
        /// Output directory for JSON files
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Generate summary report
        #[arg(long)]
        summary: bool,
        /// Continue on errors
        #[arg(long)]
        continue_on_error: bool,
    },
    /// List the names of an enumeration
    Names {
        /// Enumeration domain, e.g. theme, game-style, object-kind
        domain: EnumDomain,
        /// Look up a single code
        code: Option<u32>,
    },
}

/// Output format options
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

// ============================================================================
// Serializable Output Structures
// ============================================================================

#[derive(Serialize)]
struct CourseInfo {
    file_size: usize,
    format: String,
    name: String,
    description: String,
    game_style: String,
    game_version: String,
    timer: i16,
    clear_condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<String>,
    clear_attempts: u32,
    clear_time_ms: u32,
    areas: Vec<AreaInfo>,
}

#[derive(Serialize)]
struct AreaInfo {
    name: &'static str,
    theme: String,
    orientation: String,
    width_tiles: u32,
    height_tiles: u32,
    objects: usize,
    sounds: usize,
    ground: usize,
    tracks: usize,
    icicles: usize,
    snake_blocks: usize,
    clear_pipes: usize,
    piranha_creepers: usize,
    exclamation_blocks: usize,
    track_blocks: usize,
}

#[derive(Serialize)]
struct PaletteSummary {
    width: u32,
    height: u32,
    cell_size: u32,
    clusters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

/// Running totals for a batch, updated as each file finishes.
#[derive(Debug, Default, Serialize)]
struct BatchSummary {
    total_files: usize,
    successful: usize,
    failed: usize,
    total_objects: usize,
    style_distribution: BTreeMap<String, usize>,
    theme_distribution: BTreeMap<String, usize>,
}

impl BatchSummary {
    fn record(&mut self, level: &Level) {
        self.total_files += 1;
        self.successful += 1;
        self.total_objects += level
            .areas()
            .iter()
            .map(|(_, area)| area.objects.len())
            .sum::<usize>();
        *self
            .style_distribution
            .entry(level.header.game_style.to_string())
            .or_insert(0) += 1;
        *self
            .theme_distribution
            .entry(level.overworld.theme.to_string())
            .or_insert(0) += 1;
    }

    fn record_failure(&mut self) {
        self.total_files += 1;
        self.failed += 1;
    }
}

struct ValidationResult {
    read_valid: bool,
    container_valid: bool,
    decode_valid: bool,
    round_trip_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let overrides = command_overrides(&cli.command, cli.key);
    let config = match load_config(cli.config.as_deref(), overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let codec = match config.codec() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error building container codec: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Info {
            file,
            format,
            output,
        } => cmd_info(&file, format, &output, &codec),
        Commands::Decode {
            file,
            format,
            output,
        } => cmd_decode(&file, format, output.as_deref(), &codec),
        Commands::Encode {
            file,
            output,
            format,
        } => cmd_encode(&file, &output, format, &codec),
        Commands::Convert {
            input,
            output,
            from,
            to,
        } => cmd_convert(&input, &output, from, to, &codec),
        Commands::Render {
            file,
            format,
            output,
            ..
        } => cmd_render(&file, format, &output, config.render_scale, &codec),
        Commands::Palette {
            screenshot,
            level,
            mode,
            output,
            json,
            ..
        } => cmd_palette(
            &screenshot,
            level.as_deref(),
            mode,
            &config.palette,
            output.as_deref(),
            json.as_deref(),
            &codec,
        ),
        Commands::Validate {
            file,
            format,
            details,
        } => cmd_validate(&file, format, details, &codec),
        Commands::Batch {
            directory,
            output,
            summary,
            continue_on_error,
        } => cmd_batch(
            &directory,
            output.as_deref(),
            summary,
            continue_on_error,
            &codec,
        ),
        Commands::Names { domain, code } => cmd_names(domain, code),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Collects the flags that replace configured values.
fn command_overrides(command: &Commands, course_key: Option<String>) -> Overrides {
    let mut overrides = Overrides {
        course_key,
        ..Overrides::default()
    };
    match command {
        Commands::Render { scale, .. } => overrides.render_scale = *scale,
        Commands::Palette {
            cell_size,
            tolerance,
            ..
        } => {
            overrides.cell_size = *cell_size;
            overrides.tolerance = *tolerance;
        }
        _ => {}
    }
    overrides
}

fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<Config, String> {
    let mut config = Config::resolve(path).map_err(|e| e.to_string())?;
    config.apply_overrides(overrides);
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn resolve_format(path: &Path, explicit: Option<ContainerFormat>) -> Result<ContainerFormat, String> {
    explicit
        .or_else(|| ContainerFormat::from_path(path))
        .ok_or_else(|| {
            format!(
                "cannot infer container shape of {} (use --format)",
                path.display()
            )
        })
}

fn load_level(
    file: &Path,
    format: Option<ContainerFormat>,
    codec: &ContainerCodec,
) -> Result<(Level, usize), String> {
    let format = resolve_format(file, format)?;
    let data = std::fs::read(file).map_err(|e| e.to_string())?;
    debug!("Opening {} as {}", file.display(), format);
    let level = Level::from_container(&data, format, codec).map_err(|e| e.to_string())?;
    Ok((level, data.len()))
}

// ============================================================================
// Info Command Implementation
// ============================================================================

fn cmd_info(
    file: &Path,
    format: Option<ContainerFormat>,
    output: &OutputFormat,
    codec: &ContainerCodec,
) -> ExitCode {
    let (level, file_size) = match load_level(file, format, codec) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error reading course: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let shape = resolve_format(file, format).map_or_else(|_| "unknown".to_string(), |f| f.to_string());
    let course = build_course_info(&level, file_size, shape);

    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(&course) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Pretty => print_info(&course),
    }

    ExitCode::SUCCESS
}

fn build_course_info(level: &Level, file_size: usize, format: String) -> CourseInfo {
    let header = &level.header;
    let created = (header.year > 0).then(|| {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}",
            header.year, header.month, header.day, header.hour, header.minute
        )
    });

    CourseInfo {
        file_size,
        format,
        name: header.name.clone(),
        description: header.description.clone(),
        game_style: header.game_style.to_string(),
        game_version: header.game_version.to_string(),
        timer: header.timer,
        clear_condition: header.clear_condition_text(),
        created,
        clear_attempts: header.clear_attempts,
        clear_time_ms: header.clear_time,
        areas: level
            .areas()
            .into_iter()
            .map(|(name, area)| build_area_info(name, area))
            .collect(),
    }
}

fn build_area_info(name: &'static str, area: &Area) -> AreaInfo {
    AreaInfo {
        name,
        theme: area.theme.to_string(),
        orientation: area.orientation.to_string(),
        width_tiles: area.width_tiles(),
        height_tiles: area.height_tiles(),
        objects: area.objects.len(),
        sounds: area.sounds.len(),
        ground: area.ground.len(),
        tracks: area.tracks.len(),
        icicles: area.icicles.len(),
        snake_blocks: area.snake_blocks.len(),
        clear_pipes: area.clear_pipes.len(),
        piranha_creepers: area.piranha_creepers.len(),
        exclamation_blocks: area.exclamation_blocks.len(),
        track_blocks: area.track_blocks.len(),
    }
}

fn print_info(course: &CourseInfo) {
    println!("=== Course Information ===\n");

    println!("Name:           {}", course.name);
    if !course.description.is_empty() {
        println!("Description:    {}", course.description);
    }
    println!("Container:      {} ({} bytes)", course.format, course.file_size);
    println!("Game style:     {}", course.game_style);
    println!("Game version:   {}", course.game_version);
    println!("Timer:          {}s", course.timer);
    println!("Clear:          {}", course.clear_condition);
    if let Some(ref created) = course.created {
        println!("Created:        {}", created);
    }
    if course.clear_time_ms > 0 {
        let minutes = course.clear_time_ms / 60000;
        let seconds = (course.clear_time_ms % 60000) / 1000;
        let millis = course.clear_time_ms % 1000;
        println!(
            "Creator clear:  {:02}:{:02}.{:03} after {} attempts",
            minutes, seconds, millis, course.clear_attempts
        );
    }

    for area in &course.areas {
        println!("\n=== {} ===\n", area.name);
        println!("Theme:          {}", area.theme);
        println!("Orientation:    {}", area.orientation);
        println!("Size:           {}x{} tiles", area.width_tiles, area.height_tiles);
        println!("Objects:        {}", area.objects);
        println!("Ground tiles:   {}", area.ground);
        println!("Tracks:         {}", area.tracks);
        println!("Sounds:         {}", area.sounds);
        println!("Icicles:        {}", area.icicles);
        println!(
            "Node groups:    {} snake, {} clear pipe, {} creeper, {} exclamation, {} track",
            area.snake_blocks,
            area.clear_pipes,
            area.piranha_creepers,
            area.exclamation_blocks,
            area.track_blocks
        );
    }
}

// ============================================================================
// Decode / Encode / Convert Implementations
// ============================================================================

fn cmd_decode(
    file: &Path,
    format: Option<ContainerFormat>,
    output: Option<&Path>,
    codec: &ContainerCodec,
) -> ExitCode {
    let (level, _) = match load_level(file, format, codec) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error reading course: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let json = match serde_json::to_string_pretty(&level) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing course: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("Error writing {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    ExitCode::SUCCESS
}

fn cmd_encode(
    file: &Path,
    output: &Path,
    format: Option<ContainerFormat>,
    codec: &ContainerCodec,
) -> ExitCode {
    let text = match std::fs::read_to_string(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let level: Level = match serde_json::from_str(&text) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error parsing course JSON: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match write_container(&level, output, format, codec) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error writing container: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    from: Option<ContainerFormat>,
    to: Option<ContainerFormat>,
    codec: &ContainerCodec,
) -> ExitCode {
    let (level, _) = match load_level(input, from, codec) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error reading course: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match write_container(&level, output, to, codec) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error writing container: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn write_container(
    level: &Level,
    output: &Path,
    format: Option<ContainerFormat>,
    codec: &ContainerCodec,
) -> Result<(), String> {
    let format = resolve_format(output, format)?;
    let data = level.to_container(format, codec).map_err(|e| e.to_string())?;
    std::fs::write(output, &data).map_err(|e| e.to_string())?;
    info!("Wrote {} ({} bytes, {})", output.display(), data.len(), format);
    Ok(())
}

// ============================================================================
// Render Command Implementation
// ============================================================================

fn cmd_render(
    file: &Path,
    format: Option<ContainerFormat>,
    output_dir: &Path,
    scale: u32,
    codec: &ContainerCodec,
) -> ExitCode {
    if scale == 0 {
        eprintln!("Scale must be at least 1");
        return ExitCode::FAILURE;
    }

    let (level, _) = match load_level(file, format, codec) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error reading course: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::create_dir_all(output_dir) {
        eprintln!("Failed to create output directory: {}", e);
        return ExitCode::FAILURE;
    }

    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    let mut written = 0;

    for (name, area) in level.areas() {
        if area.width_tiles() == 0 || area.height_tiles() == 0 {
            warn!("Skipping {}: area has no extent", name);
            continue;
        }

        let image = raster::upscale(&raster::rasterize(area), scale);
        let png = match raster::encode_png(&image) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error encoding {}: {}", name, e);
                return ExitCode::FAILURE;
            }
        };

        let path = output_dir.join(format!("{}_{}.png", stem, name));
        if let Err(e) = std::fs::write(&path, png) {
            eprintln!("Error writing {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        println!(
            "{}: {}x{} -> {}",
            name,
            image.width(),
            image.height(),
            path.display()
        );
        written += 1;
    }

    if written == 0 {
        eprintln!("No areas to render");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// ============================================================================
// Palette Command Implementation
// ============================================================================

fn cmd_palette(
    screenshot: &Path,
    level_file: Option<&Path>,
    mode: PaletteMode,
    settings: &palette::PaletteConfig,
    output: Option<&Path>,
    json: Option<&Path>,
    codec: &ContainerCodec,
) -> ExitCode {
    let bytes = match std::fs::read(screenshot) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let image = match palette::load_screenshot(&bytes) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error decoding screenshot: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let level = match level_file.map(|path| load_level(path, None, codec)).transpose() {
        Ok(l) => l.map(|(level, _)| level),
        Err(e) => {
            eprintln!("Error reading course: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let grid = palette::extract_palette(&image, level.as_ref(), mode, settings);

    if let Some(path) = output {
        let png = match raster::encode_png(&grid.to_image()) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error encoding grid: {}", e);
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = std::fs::write(path, png) {
            eprintln!("Error writing {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        info!("Wrote {}", path.display());
    }

    if let Some(path) = json {
        let written = serde_json::to_string(&grid)
            .map_err(|e| e.to_string())
            .and_then(|text| std::fs::write(path, text).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Error writing {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        info!("Wrote {}", path.display());
    }

    let summary = PaletteSummary {
        width: grid.width,
        height: grid.height,
        cell_size: grid.cell_size,
        clusters: grid.palette.len(),
        theme: grid.theme.map(|t| t.to_string()),
    };

    println!("=== Palette ===\n");
    println!("Grid:        {}x{} cells", summary.width, summary.height);
    println!("Cell size:   {}px", summary.cell_size);
    println!("Clusters:    {}", summary.clusters);
    if let Some(ref theme) = summary.theme {
        println!("Theme:       {}", theme);
    }

    ExitCode::SUCCESS
}

// ============================================================================
// Validate Command Implementation
// ============================================================================

fn cmd_validate(
    file: &Path,
    format: Option<ContainerFormat>,
    details: bool,
    codec: &ContainerCodec,
) -> ExitCode {
    let result = validate_course(file, format, codec);

    if details {
        print_validation_details(&result, file);
    } else {
        print_validation_summary(&result, file);
    }

    if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn validate_course(
    file: &Path,
    format: Option<ContainerFormat>,
    codec: &ContainerCodec,
) -> ValidationResult {
    let mut result = ValidationResult {
        read_valid: false,
        container_valid: false,
        decode_valid: false,
        round_trip_valid: false,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    let format = match resolve_format(file, format) {
        Ok(f) => f,
        Err(e) => {
            result.errors.push(e);
            return result;
        }
    };

    // Step 1: Read file
    let data = match std::fs::read(file) {
        Ok(d) => {
            result.read_valid = true;
            d
        }
        Err(e) => {
            result.errors.push(format!("Failed to read file: {}", e));
            return result;
        }
    };

    // Step 2: Open the container
    let plaintext = match codec.open(&data, format) {
        Ok(p) => {
            result.container_valid = true;
            p
        }
        Err(e) => {
            result.errors.push(format!("Container failed: {}", e));
            return result;
        }
    };

    if plaintext.len() != PLAINTEXT_SIZE {
        result.warnings.push(format!(
            "Plaintext size mismatch: expected {}, got {}",
            PLAINTEXT_SIZE,
            plaintext.len()
        ));
    }

    // Step 3: Decode the course
    let level = match Level::decode(&plaintext) {
        Ok(l) => {
            result.decode_valid = true;
            l
        }
        Err(e) => {
            result.errors.push(format!("Course decoding failed: {}", e));
            return result;
        }
    };

    for (name, area) in level.areas() {
        if area.theme.name().known().is_none() {
            result
                .warnings
                .push(format!("{} has unknown theme {}", name, area.theme));
        }
        let unknown = area
            .objects
            .iter()
            .filter(|object| !object.kind.name().is_known())
            .count();
        if unknown > 0 {
            result
                .warnings
                .push(format!("{} has {} objects of unknown kind", name, unknown));
        }
    }

    // Step 4: Re-encode and compare
    let encoded = level.encode();
    let compared = plaintext.len().min(PLAINTEXT_SIZE);
    if encoded[..compared] == plaintext[..compared] {
        result.round_trip_valid = true;
    } else {
        result
            .warnings
            .push("Re-encoded course differs (non-zero unused slots or padding)".to_string());
    }

    result
}

fn print_validation_summary(result: &ValidationResult, file: &Path) {
    let status = if result.is_valid() { "VALID" } else { "INVALID" };
    println!("{}: {}", file.display(), status);
}

fn print_validation_details(result: &ValidationResult, file: &Path) {
    println!("Validating: {}\n", file.display());

    println!("Checks:");
    println!("  File read:         {}", status_icon(result.read_valid));
    println!("  Container:         {}", status_icon(result.container_valid));
    println!("  Course decoding:   {}", status_icon(result.decode_valid));
    println!("  Round trip:        {}", status_icon(result.round_trip_valid));

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in &result.errors {
            println!("  - {}", error);
        }
    }

    if !result.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    println!(
        "\nResult: {}",
        if result.is_valid() { "VALID" } else { "INVALID" }
    );
}

fn status_icon(valid: bool) -> &'static str {
    if valid {
        "OK"
    } else {
        "FAILED"
    }
}

// ============================================================================
// Batch Command Implementation
// ============================================================================

fn cmd_batch(
    directory: &Path,
    output_dir: Option<&Path>,
    summary: bool,
    continue_on_error: bool,
    codec: &ContainerCodec,
) -> ExitCode {
    let courses = find_courses(directory);

    if courses.is_empty() {
        eprintln!("No course files found in {}", directory.display());
        return ExitCode::FAILURE;
    }

    eprintln!("Found {} course files", courses.len());

    if let Some(dir) = output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Failed to create output directory: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let mut totals = BatchSummary::default();

    for course in &courses {
        eprint!(
            "Processing {}... ",
            course.file_name().unwrap_or_default().to_string_lossy()
        );

        match process_course(course, output_dir, codec) {
            Ok(level) => {
                eprintln!("OK");
                totals.record(&level);
            }
            Err(e) => {
                eprintln!("ERROR: {}", e);
                warn!("Skipped {}: {}", course.display(), e);
                totals.record_failure();
                if !continue_on_error {
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    eprintln!(
        "\nProcessed: {} success, {} errors",
        totals.successful, totals.failed
    );

    if summary {
        print_summary(&totals, output_dir);
    }

    ExitCode::SUCCESS
}

fn find_courses(directory: &Path) -> Vec<PathBuf> {
    let mut courses = Vec::new();

    if let Ok(entries) = std::fs::read_dir(directory) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && ContainerFormat::from_path(&path).is_some() {
                courses.push(path);
            }
        }
    }

    courses.sort();
    courses
}

fn process_course(
    course: &Path,
    output_dir: Option<&Path>,
    codec: &ContainerCodec,
) -> Result<Level, String> {
    let (level, _) = load_level(course, None, codec)?;

    if let Some(dir) = output_dir {
        let output_file = dir
            .join(course.file_stem().unwrap_or_default())
            .with_extension("json");
        let content = serde_json::to_string_pretty(&level).map_err(|e| e.to_string())?;
        std::fs::write(&output_file, content).map_err(|e| e.to_string())?;
    }

    Ok(level)
}

fn print_summary(summary: &BatchSummary, output_dir: Option<&Path>) {
    println!("\n=== Batch Summary ===");
    println!("Files processed: {}", summary.total_files);
    println!("Successful: {}", summary.successful);
    println!("Failed: {}", summary.failed);
    println!("Total objects: {}", summary.total_objects);

    println!("\nStyle distribution:");
    for (style, count) in &summary.style_distribution {
        println!("  {}: {}", style, count);
    }

    println!("\nTheme distribution:");
    for (theme, count) in &summary.theme_distribution {
        println!("  {}: {}", theme, count);
    }

    if let Some(dir) = output_dir {
        let summary_file = dir.join("summary.json");
        if let Ok(json) = serde_json::to_string_pretty(summary) {
            if std::fs::write(&summary_file, json).is_ok() {
                println!("\nSummary written to: {}", summary_file.display());
            }
        }
    }
}

// ============================================================================
// Names Command Implementation
// ============================================================================

fn cmd_names(domain: EnumDomain, code: Option<u32>) -> ExitCode {
    if let Some(code) = code {
        println!("{} {}: {}", domain, code, domain.lookup(code));
        return ExitCode::SUCCESS;
    }

    println!("=== {} ===\n", domain);
    for (code, name) in domain.entries() {
        println!("{:>10}  {}", code, name);
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_codec::enums::{GameStyle, ObjectKind, Theme};
    use course_codec::level::LevelObject;

    fn level_with(style: GameStyle, theme: Theme, objects: usize) -> Level {
        let mut level = Level::default();
        level.header.game_style = style;
        level.overworld.theme = theme;
        for _ in 0..objects {
            level
                .subworld
                .objects
                .push(LevelObject {
                    kind: ObjectKind::Coin,
                    ..LevelObject::default()
                })
                .unwrap();
        }
        level
    }

    #[test]
    fn test_batch_summary_counts_each_file() {
        let mut summary = BatchSummary::default();
        summary.record(&level_with(GameStyle::Smw, Theme::Castle, 2));
        summary.record_failure();
        summary.record(&level_with(GameStyle::Smw, Theme::Forest, 3));

        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_objects, 5);
        assert_eq!(summary.style_distribution[&GameStyle::Smw.to_string()], 2);
        assert_eq!(summary.theme_distribution.len(), 2);
    }

    #[test]
    fn test_overrides_come_from_the_running_command() {
        let render = Commands::Render {
            file: PathBuf::from("course.bcd"),
            format: None,
            output: PathBuf::from("course.png"),
            scale: Some(0),
        };
        let overrides = command_overrides(&render, None);
        assert_eq!(overrides.render_scale, Some(0));

        let mut config = Config::default();
        config.apply_overrides(overrides);
        assert!(config.validate().is_err());
    }
}
