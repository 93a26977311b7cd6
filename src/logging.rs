use colored::*;
use console::measure_text_width;
use std::fmt;
use tracing::Level;
use tracing_subscriber::{
    fmt::{FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const CRATE_TARGET: &str = "lookbook_api_rt";

pub struct CleanFormatter;

impl<S, N> FormatEvent<S, N> for CleanFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let now = chrono::Local::now();
        let timestamp = now.format("%H:%M:%S").to_string();

        let level = *event.metadata().level();
        let level_str = format_level(&level);

        let target = event.metadata().target();
        let module = extract_module_name(target);

        // 计算各字段的实际显示宽度
        let timestamp_width = measure_text_width(&timestamp);
        let level_width = measure_text_width(&level_str.to_string());
        let module_width = measure_text_width(&module);

        const TIMESTAMP_WIDTH: usize = 8; // HH:MM:SS
        const LEVEL_WIDTH: usize = 5;
        const MODULE_WIDTH: usize = 5;

        let timestamp_padding = TIMESTAMP_WIDTH.saturating_sub(timestamp_width);
        let level_padding = LEVEL_WIDTH.saturating_sub(level_width);
        let module_padding = MODULE_WIDTH.saturating_sub(module_width);

        write!(
            writer,
            "{}{} {}{} {}{} {} ",
            timestamp.bright_black(),
            " ".repeat(timestamp_padding),
            level_str,
            " ".repeat(level_padding),
            module.bright_blue(),
            " ".repeat(module_padding),
            "│".bright_black()
        )?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn format_level(level: &Level) -> ColoredString {
    match *level {
        Level::ERROR => "ERROR".bright_red(),
        Level::WARN => "WARN ".bright_yellow(),
        Level::INFO => "INFO ".bright_green(),
        Level::DEBUG => "DEBUG".bright_blue(),
        Level::TRACE => "TRACE".bright_magenta(),
    }
}

fn extract_module_name(target: &str) -> String {
    let module = if target.starts_with(CRATE_TARGET) {
        let stripped = target
            .strip_prefix(&format!("{CRATE_TARGET}::"))
            .unwrap_or(target);
        if stripped == CRATE_TARGET {
            "main"
        } else {
            stripped.split("::").last().unwrap_or("app")
        }
    } else {
        target.split("::").last().unwrap_or(target)
    };

    // 限制模块名最大长度
    const MAX_MODULE_LEN: usize = 8;
    if module.len() > MAX_MODULE_LEN {
        format!("{:.len$}", module, len = MAX_MODULE_LEN - 2) + ".."
    } else {
        format!("{module:<MAX_MODULE_LEN$}")
    }
}

pub fn init_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(
            "info,sqlx=warn,sqlx::query=off,sea_orm=warn,sea_orm_migration=warn,tokio_util=warn",
        )
    })?;

    let use_colors = atty::is(atty::Stream::Stdout);

    if use_colors {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .event_format(CleanFormatter)
                    .with_ansi(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_ansi(false))
            .init();
    }

    Ok(())
}

pub fn log_startup_info(config: &crate::config::Config) {
    println!();
    println!("{}", "─".repeat(60).bright_cyan());
    println!("{}", "  🚀 Lookbook 数据初始化中...".bright_cyan().bold());
    println!("{}", "─".repeat(60).bright_cyan());

    tracing::info!("配置加载成功");
    tracing::info!("数据库: {}", mask_database_url(&config.database.url));
    tracing::info!(
        "连接池: {}~{}",
        config.database.min_connections,
        config.database.max_connections
    );
}

pub fn log_store_ready(looks: u64, galleries: u64) {
    println!("{}", "─".repeat(60).bright_green());
    println!("{}", "  ✅ 数据表就绪".bright_green().bold());
    println!("{}", "─".repeat(60).bright_green());
    println!("  📷 Looks: {}", looks.to_string().bright_white());
    println!("  🖼️  Galleries: {}", galleries.to_string().bright_white());
    println!("{}", "─".repeat(60).bright_green());
    println!();

    tracing::info!("数据表就绪: looks={}, galleries={}", looks, galleries);
}

fn mask_database_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut masked = parsed.clone();
        if parsed.password().is_some() {
            let _ = masked.set_password(Some("****"));
        }
        masked.to_string()
    } else {
        "***已屏蔽***".to_string()
    }
}

pub fn log_shutdown() {
    println!();
    println!("{}", "─".repeat(60).bright_yellow());
    println!("{}", "  👋 关闭中...".bright_yellow().bold());
    println!("{}", "─".repeat(60).bright_yellow());
    tracing::info!("关闭完成");
}
