use packages::InstalledPackage;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Style, Stylize},
    widgets::{Block, Clear, Paragraph, Row, Table, Widget},
};

/// Overlay listing the installed packages
pub struct PackagesView<'a> {
    /// `None` while the list is still being fetched
    packages: Option<&'a [InstalledPackage]>,
}

impl<'a> PackagesView<'a> {
    pub fn new(packages: Option<&'a [InstalledPackage]>) -> Self {
        Self { packages }
    }
}

impl Widget for PackagesView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::bordered().title(" Installed packages (Esc to close) ");

        let Some(packages) = self.packages else {
            Paragraph::new("Loading...").block(block).render(area, buf);
            return;
        };

        let rows = packages
            .iter()
            .map(|p| Row::new([p.name.as_str(), p.version.as_str()]));
        Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
            .header(Row::new(["Package", "Version"]).style(Style::default().bold()))
            .block(block)
            .render(area, buf);
    }
}
