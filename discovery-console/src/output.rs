use chrono::{DateTime, Utc};
use prospect_research::{BuyerProspect, DiscoverySummary, ResearchResult};

const NAME_WIDTH: usize = 26;
const COUNTRY_WIDTH: usize = 15;
const SEGMENT_WIDTH: usize = 22;
const ID_WIDTH: usize = 12;

pub fn print_result(result: &ResearchResult, completed_at: Option<DateTime<Utc>>) {
    println!("{}", render_result(result, completed_at));
}

pub fn print_summary(summary: &DiscoverySummary) {
    println!("{}", render_summary(summary));
}

pub fn print_buyer_detail(buyer: &BuyerProspect) {
    println!("{}", render_buyer_detail(buyer));
}

fn render_result(result: &ResearchResult, completed_at: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();
    let company = &result.source_company;

    let name = company.name.as_deref().unwrap_or("(unnamed company)");
    match company.url.as_deref() {
        Some(url) if !url.is_empty() => out.push_str(&format!("{name} ({url})\n")),
        _ => out.push_str(&format!("{name}\n")),
    }
    if let Some(overview) = non_empty(company.overview.as_deref()) {
        out.push_str(&format!("  {overview}\n"));
    }
    if let Some(model) = non_empty(company.business_model.as_deref()) {
        out.push_str(&format!("  Business model: {model}\n"));
    }
    if let Some(coverage) = non_empty(company.therapeutic_coverage.as_deref()) {
        out.push_str(&format!("  Therapeutic coverage: {coverage}\n"));
    }
    if let Some(icp) = non_empty(result.ideal_customer_profile.as_deref()) {
        out.push_str(&format!("  Ideal customer profile: {icp}\n"));
    }
    if let Some(at) = completed_at {
        out.push_str(&format!("  Received: {}\n", at.format("%Y-%m-%d %H:%M UTC")));
    }

    out.push('\n');
    out.push_str(&render_summary(&result.summary()));
    out.push('\n');

    if !result.discovered_buyers.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "{:<ID_WIDTH$}  {:<NAME_WIDTH$}  {:<COUNTRY_WIDTH$}  {:<SEGMENT_WIDTH$}  {:>5}  STATUS\n",
            "ID", "NAME", "COUNTRY", "SEGMENT", "SCORE"
        ));
        for buyer in &result.discovered_buyers {
            out.push_str(&render_prospect_row(buyer));
            out.push('\n');
        }
    }
    out
}

fn render_summary(summary: &DiscoverySummary) -> String {
    format!(
        "{} prospects, {} high priority, avg score {}, {} countries",
        summary.total_buyers,
        summary.high_priority,
        summary.average_opportunity_score,
        summary.distinct_countries
    )
}

fn render_prospect_row(buyer: &BuyerProspect) -> String {
    format!(
        "{:<ID_WIDTH$}  {:<NAME_WIDTH$}  {:<COUNTRY_WIDTH$}  {:<SEGMENT_WIDTH$}  {:>5}  {}",
        truncate(&buyer.id.to_string(), ID_WIDTH),
        truncate(&buyer.name, NAME_WIDTH),
        truncate(&buyer.country, COUNTRY_WIDTH),
        truncate(&buyer.target_segment, SEGMENT_WIDTH),
        buyer.opportunity_score,
        buyer.status
    )
}

fn render_buyer_detail(buyer: &BuyerProspect) -> String {
    let mut out = format!("{} [{}]\n", buyer.name, buyer.id);
    if !buyer.website.is_empty() {
        out.push_str(&format!("  Website: {}\n", buyer.website));
    }
    match non_empty(buyer.region.as_deref()) {
        Some(region) => out.push_str(&format!("  Location: {} ({region})\n", buyer.country)),
        None => out.push_str(&format!("  Location: {}\n", buyer.country)),
    }
    out.push_str(&format!("  Segment: {}\n", buyer.target_segment));
    out.push_str(&format!(
        "  Score: {} ({})\n",
        buyer.opportunity_score, buyer.status
    ));
    if let Some(reason) = non_empty(Some(buyer.reason_for_recommendation.as_str())) {
        out.push_str(&format!("  Why: {reason}\n"));
    }
    if buyer.key_contacts.is_empty() {
        out.push_str("  Contacts: none listed\n");
    } else {
        out.push_str("  Contacts:\n");
        for contact in &buyer.key_contacts {
            out.push_str(&format!("    - {}\n", contact.display_line()));
        }
    }
    out
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
