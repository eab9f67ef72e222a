//! Turns an [`AnalysisResult`] into a downloadable PDF. Sections mirror the
//! dashboard cards: every populated section gets a heading, empty lists are
//! skipped rather than rendered as bare headings.

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

use repurpose_common::schema::{
    AnalysisResult, ClinicalReport, FinalSynthesis, MasterPlan, PatentReport,
};

use crate::layout::PageComposer;

/// Filename suggested to the browser via Content-Disposition.
pub const REPORT_FILENAME: &str = "repurpose_report.pdf";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the analysis into a complete PDF document in memory.
pub fn render_report(analysis: &AnalysisResult) -> Result<Vec<u8>, ReportError> {
    let pages = compose(analysis).finish();
    let page_count = pages.len();
    let bytes = build_document(pages)?;
    tracing::debug!(pages = page_count, size_bytes = bytes.len(), "report rendered");
    Ok(bytes)
}

fn compose(analysis: &AnalysisResult) -> PageComposer {
    let mut page = PageComposer::new();
    page.title("RepurposeAI Analysis Report");
    page.small(&format!("Generated {}", Utc::now().format("%Y-%m-%d %H:%M UTC")));

    if analysis.is_empty() {
        page.space(10.0);
        page.body("No analysis sections were provided.");
        return page;
    }

    if let Some(plan) = &analysis.master {
        master_section(&mut page, plan);
    }
    if let Some(report) = &analysis.clinical {
        clinical_section(&mut page, report);
    }
    if let Some(report) = &analysis.patent {
        patent_section(&mut page, report);
    }
    if let Some(synthesis) = &analysis.synthesis {
        synthesis_section(&mut page, synthesis);
    }
    page
}

fn master_section(page: &mut PageComposer, plan: &MasterPlan) {
    page.heading("Master Plan");
    page.labeled("Drug:", &plan.drug);
    page.labeled("Indication:", &plan.indication);
    bullet_block(page, "Objectives", &plan.objectives);
    if !plan.tasks.is_empty() {
        page.subheading("Delegated Tasks");
        for task in &plan.tasks {
            page.bullet(&format!(
                "[{}] {} -> {}: {}",
                task.priority.as_str(),
                task.task_id,
                task.agent.as_str(),
                task.description
            ));
        }
    }
    bullet_block(page, "Assumptions", &plan.assumptions);
    bullet_block(page, "Constraints", &plan.constraints);
    bullet_block(page, "Required Sources", &plan.required_sources);
}

fn clinical_section(page: &mut PageComposer, report: &ClinicalReport) {
    page.heading("Clinical Evidence");
    page.labeled("Overall signal:", report.overall_signal.as_str());
    if !report.evidence.is_empty() {
        page.subheading("Evidence");
        for item in &report.evidence {
            match item.sample_size {
                Some(n) => page.bullet(&format!(
                    "{} - {} (n={})",
                    item.source_id, item.study_type, n
                )),
                None => page.bullet(&format!("{} - {}", item.source_id, item.study_type)),
            }
            page.small(&format!(
                "Signal: {}. {}",
                item.statistical_signal.as_str(),
                item.outcome_summary
            ));
            for limitation in &item.limitations {
                page.small(&format!("Limitation: {limitation}"));
            }
        }
    }
    bullet_block(page, "Confidence Notes", &report.confidence_notes);
}

fn patent_section(page: &mut PageComposer, report: &PatentReport) {
    page.heading("Patent Landscape");
    page.labeled("Freedom to operate:", report.freedom_to_operate.as_str());
    if !report.key_patents.is_empty() {
        page.subheading("Key Patents");
        for patent in &report.key_patents {
            page.bullet(&format!(
                "{} ({}) - {} coverage, {} relevance",
                patent.patent_id,
                patent.jurisdiction,
                patent.coverage_type,
                patent.relevance.as_str()
            ));
            match (patent.filing_year, patent.expiry_year) {
                (Some(filed), Some(expires)) => {
                    page.small(&format!("Filed {filed}, expires {expires}"));
                }
                (Some(filed), None) => page.small(&format!("Filed {filed}")),
                (None, Some(expires)) => page.small(&format!("Expires {expires}")),
                (None, None) => {}
            }
        }
    }
    bullet_block(page, "Risks", &report.risks);
    bullet_block(page, "Whitespace Opportunities", &report.whitespace_opportunities);
}

fn synthesis_section(page: &mut PageComposer, synthesis: &FinalSynthesis) {
    page.heading("Final Synthesis");
    page.labeled(
        "Hypothesis strength:",
        &format!("{} / 10", synthesis.hypothesis_strength_score.value),
    );
    bullet_block(page, "Rationale", &synthesis.hypothesis_strength_score.rationale);
    bullet_block(page, "Aligned Signals", &synthesis.aligned_signals);
    bullet_block(page, "Contradictions", &synthesis.contradictions);
    bullet_block(page, "Key Risks", &synthesis.key_risks);
    bullet_block(page, "Recommended Next Steps", &synthesis.recommended_next_steps);
    bullet_block(page, "Explicit Limitations", &synthesis.explicit_limitations);
    if !synthesis.opportunity_summary.is_empty() {
        page.subheading("Opportunity Summary");
        page.body(&synthesis.opportunity_summary);
    }
}

fn bullet_block(page: &mut PageComposer, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    page.subheading(heading);
    for item in items {
        page.bullet(item);
    }
}

/// Assembles the page content streams into a PDF with the two Helvetica
/// faces registered as F1/F2 on the shared page tree.
fn build_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, ReportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
