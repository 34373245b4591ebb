//! Terminal and JSON rendering of view models.

use hos_data::{truncate_label, SortField, SortOrder};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::ExplorerResult;
use crate::explorer::DeriveReport;
use crate::views::{
    Dashboard, DirectoryPage, FilterChoices, NetworkView, PersonDetail, SearchPage,
};

/// Choice labels longer than this are shortened in the directory.
pub const DIRECTORY_LABEL_MAX: usize = 40;
/// Choice labels longer than this are shortened in the network view.
pub const NETWORK_LABEL_MAX: usize = 50;

/// Plain-text rendering of a view.
pub trait TextView {
    fn render_text(&self) -> String;
}

/// Render a view in the requested format.
pub fn render<V: TextView + Serialize>(view: &V, format: OutputFormat) -> ExplorerResult<String> {
    match format {
        OutputFormat::Text => Ok(view.render_text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
    }
}

fn dash_if_empty(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join("; ")
    }
}

fn org_count(count: usize) -> String {
    match count {
        0 => "-".to_string(),
        1 => "1 org".to_string(),
        n => format!("{n} orgs"),
    }
}

fn write_choices(out: &mut String, choices: &FilterChoices, max: usize) {
    let sections = [
        ("Organizations", &choices.organizations),
        ("Journals", &choices.journals),
        ("Awards", &choices.awards),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        let labels: Vec<String> = items.iter().map(|i| truncate_label(i, max)).collect();
        out.push_str(&format!("{title}: {}\n", labels.join(" | ")));
    }
}

impl TextView for SearchPage {
    fn render_text(&self) -> String {
        if self.hits.is_empty() {
            return format!("No results found for \"{}\"\n", self.query);
        }

        let mut out = String::new();
        for hit in &self.hits {
            out.push_str(&format!("{}  ({})\n", hit.name, hit.url));
            if let Some(description) = &hit.description {
                out.push_str(&format!("    {description}\n"));
            }
            if !hit.roles.is_empty() {
                out.push_str(&format!("    {}\n", hit.roles.join(", ")));
            }
        }
        out
    }
}

impl TextView for DirectoryPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let arrow = match self.sort.order {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        let field = match self.sort.field {
            SortField::Name => "name",
            SortField::RoleCount => "roles",
        };
        out.push_str(&format!("{} (sorted by {field} {arrow})\n", self.count_label()));

        for row in &self.rows {
            out.push_str(&format!(
                "{} | {} | {} | {} | {}\n",
                row.name,
                dash_if_empty(&row.awards),
                dash_if_empty(&row.journals),
                org_count(row.membership_count),
                row.role_count
            ));
        }
        write_choices(&mut out, &self.choices, DIRECTORY_LABEL_MAX);
        out
    }
}

impl TextView for PersonDetail {
    fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.person.name));
        if let Some(description) = &self.person.description {
            out.push_str(&format!("{description}\n"));
        }
        for link in &self.links {
            out.push_str(&format!("  {}: {}\n", link.label, link.url));
        }

        let sections = [
            ("Awards", &self.awards),
            ("Editorships", &self.editorships),
            ("Memberships", &self.memberships),
        ];
        for (title, lines) in sections {
            if lines.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{title} ({})\n", lines.len()));
            for line in lines {
                let label = match &line.detail {
                    Some(detail) => format!("{} ({detail})", line.name),
                    None => line.name.clone(),
                };
                if line.years.is_empty() {
                    out.push_str(&format!("  {label}\n"));
                } else {
                    out.push_str(&format!("  {label}, {}\n", line.years));
                }
            }
        }

        out.push_str("\nNetwork\n");
        if self.network.is_isolated() {
            out.push_str("  No network connections found.\n");
        } else {
            for link in &self.network.links {
                let other = link.other(&self.network.center).unwrap_or(&link.target);
                let name = self
                    .network
                    .nodes
                    .iter()
                    .find(|n| n.id == other)
                    .map(|n| n.name.as_str())
                    .unwrap_or(other);
                out.push_str(&format!("  {name} (weight {})\n", link.weight));
            }
        }
        out
    }
}

impl TextView for NetworkView {
    fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.summary()));
        for node in &self.nodes {
            out.push_str(&format!(
                "{} [{:?}] degree {}\n",
                node.node.name, node.category, node.degree
            ));
        }
        write_choices(&mut out, &self.choices, NETWORK_LABEL_MAX);
        out
    }
}

impl TextView for Dashboard {
    fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("People:        {}\n", self.total_people));
        out.push_str(&format!("Awards:        {}\n", self.total_awards));
        out.push_str(&format!("Journals:      {}\n", self.total_journals));
        out.push_str(&format!("Organizations: {}\n", self.total_organizations));

        if !self.timeline.is_empty() {
            out.push_str("\nTimeline\n");
            for entry in &self.timeline {
                out.push_str(&format!("  {}s  {}\n", entry.decade, entry.count));
            }
        }
        if !self.top_connected.is_empty() {
            out.push_str("\nMost connected\n");
            for person in &self.top_connected {
                out.push_str(&format!("  {}  {}\n", person.name, person.connections));
            }
        }
        if !self.top_organizations.is_empty() {
            out.push_str("\nLargest organizations\n");
            for org in &self.top_organizations {
                out.push_str(&format!("  {}  {}\n", org.name, org.count));
            }
        }
        out
    }
}

impl TextView for hos_data::ConsistencyReport {
    fn render_text(&self) -> String {
        if self.is_clean() {
            return "Datasets are consistent\n".to_string();
        }
        let mut out = String::new();
        for id in &self.unknown_graph_nodes {
            out.push_str(&format!("graph node not in people: {id}\n"));
        }
        for id in &self.unknown_top_connected {
            out.push_str(&format!("top_connected entry not in people: {id}\n"));
        }
        out
    }
}

impl TextView for DeriveReport {
    fn render_text(&self) -> String {
        format!(
            "{} people -> {} nodes, {} links\n  {}\n  {}\n",
            self.people,
            self.nodes,
            self.links,
            self.graph_path.display(),
            self.stats_path.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{DirectoryRow, RoleLine, SearchHit};
    use hos_data::{DecadeCount, EgoNetwork, GraphLink, GraphNode, Person, SortState};

    #[test]
    fn test_empty_search_message() {
        let page = SearchPage {
            query: "zz".to_string(),
            hits: vec![],
        };
        assert_eq!(page.render_text(), "No results found for \"zz\"\n");
    }

    #[test]
    fn test_search_json_keeps_markup() {
        let page = SearchPage {
            query: "kuhn".to_string(),
            hits: vec![SearchHit {
                id: "Q1".to_string(),
                url: "person.html?id=Q1".to_string(),
                name: "<mark>Kuhn</mark>, Thomas".to_string(),
                description: None,
                roles: vec!["1 award".to_string()],
            }],
        };
        let json = render(&page, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["hits"][0]["name"], "<mark>Kuhn</mark>, Thomas");
        assert!(value["hits"][0].get("description").is_none());
    }

    #[test]
    fn test_directory_row_columns() {
        let page = DirectoryPage {
            rows: vec![DirectoryRow {
                id: "Q1".to_string(),
                url: "person.html?id=Q1".to_string(),
                name: "Sarton, George".to_string(),
                description: None,
                awards: vec![],
                journals: vec!["Isis".to_string(), "Osiris".to_string()],
                membership_count: 2,
                role_count: 4,
                links: vec![],
            }],
            total: 10,
            sort: SortState::default(),
            choices: FilterChoices {
                journals: vec!["x".repeat(60)],
                ..FilterChoices::default()
            },
        };

        let text = page.render_text();
        assert!(text.starts_with("1 of 10 people (sorted by name asc)"));
        assert!(text.contains("Sarton, George | - | Isis; Osiris | 2 orgs | 4"));
        assert!(text.contains(&format!("Journals: {}...", "x".repeat(38))));
    }

    #[test]
    fn test_person_detail_text() {
        let detail = PersonDetail {
            person: Person::new("Q2", "Kuhn, Thomas"),
            url: "person.html?id=Q2".to_string(),
            links: vec![],
            awards: vec![RoleLine {
                name: "Sarton Medal".to_string(),
                detail: None,
                years: "1982".to_string(),
            }],
            editorships: vec![],
            memberships: vec![RoleLine {
                name: "History of Science Society".to_string(),
                detail: Some("president".to_string()),
                years: "1968 - 1970".to_string(),
            }],
            network: EgoNetwork {
                center: "Q2".to_string(),
                nodes: vec![GraphNode::new("Q1", "Sarton, George"), GraphNode::new("Q2", "Kuhn, Thomas")],
                links: vec![GraphLink::new("Q1", "Q2", 3)],
            },
        };

        let text = detail.render_text();
        assert!(text.contains("Awards (1)\n  Sarton Medal, 1982"));
        assert!(text.contains("  History of Science Society (president), 1968 - 1970"));
        assert!(text.contains("  Sarton, George (weight 3)"));
        assert!(!text.contains("Editorships"));
    }

    #[test]
    fn test_dashboard_text_skips_empty_sections() {
        let dashboard = Dashboard {
            total_people: 3,
            total_awards: 2,
            total_journals: 1,
            total_organizations: 1,
            timeline: vec![DecadeCount {
                decade: 1960,
                count: 4,
            }],
            top_connected: vec![],
            top_organizations: vec![],
        };

        let text = dashboard.render_text();
        assert!(text.starts_with("People:        3\nAwards:        2\n"));
        assert!(text.contains("\nTimeline\n  1960s  4\n"));
        assert!(!text.contains("Most connected"));
        assert!(!text.contains("Largest organizations"));
    }

    #[test]
    fn test_isolated_person_text() {
        let detail = PersonDetail {
            person: Person::new("Q9", "Lonely, Scholar"),
            url: "person.html?id=Q9".to_string(),
            links: vec![],
            awards: vec![],
            editorships: vec![],
            memberships: vec![],
            network: EgoNetwork {
                center: "Q9".to_string(),
                nodes: vec![GraphNode::new("Q9", "Lonely, Scholar")],
                links: vec![],
            },
        };
        assert!(detail.render_text().contains("No network connections found."));
    }
}
