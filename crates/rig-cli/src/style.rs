// SPDX-License-Identifier: GPL-3.0

use console::Style;
use rig_network::LaunchSpec;

pub(crate) fn get_styles() -> clap::builder::Styles {
	use clap::builder::styling::{AnsiColor, Color, Style};
	clap::builder::Styles::styled()
		.usage(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::BrightCyan))))
		.header(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::BrightCyan))))
		.literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightMagenta))))
		.invalid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
		.error(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
		.valid(
			Style::new()
				.bold()
				.underline()
				.fg_color(Some(Color::Ansi(AnsiColor::BrightMagenta))),
		)
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

/// Tags the launch with a colored `name: ` console prefix. Colors cycle by
/// peer index so concurrently launched nodes stay distinguishable.
pub(crate) fn colorize(launch: &mut LaunchSpec) {
	let palette = [
		Style::new().cyan(),
		Style::new().magenta(),
		Style::new().yellow(),
		Style::new().green(),
		Style::new().blue(),
		Style::new().red(),
	];
	let style = &palette[launch.peer().index() % palette.len()];
	let prefix = format!("{}: ", style.apply_to(launch.name()));
	launch.set_prefix(prefix);
}

/// Formats an URL with bold and underlined style.
pub(crate) fn format_url(url: &str) -> String {
	format!("{}", Style::new().bold().underlined().apply_to(url))
}
