//! Project planning commands: evaluate, plan and prioritize.
//!
//! Each sends fixed questions about the MAG study and keeps the replies
//! as plain-text reports under the results directory.

use super::output::{banner, part, print_reply, reply_text};
use crate::config::Session;
use colored::Colorize;
use rumen_core::prompts::PromptTemplate;
use rumen_core::{Report, StudyContext, TaskRouter, TaskType};

const EVALUATION_QUESTION: PromptTemplate = PromptTemplate::new(
    "I have 157 assembled herptile (reptile/amphibian) gut metagenome samples with:
- GTDB-Tk taxonomic classifications
- CheckM quality assessments
- Binned MAGs from MetaBAT2

Research plan: Identify and characterize high-quality {{focus_family}} MAGs
from these herptile gut samples.

Critical evaluation needed:
1. Is this publishable? What's the novelty?
2. {{focus_family}} is well-studied in mammals - what's unique about herptile hosts?
3. What would make this study impactful vs. just another MAG catalog?
4. What comparisons/analyses are essential?
5. Should I compare to my existing {{reference_family}} work from the same samples?
6. What are the gaps in current {{focus_family}} knowledge that this could fill?",
);

const DOWNLOAD_STRATEGY_QUESTION: PromptTemplate = PromptTemplate::new(
    "I have 284 high-quality {{focus_family}} MAGs from herptile gut metagenomes (836 MB total).
I'm working on HPCC cluster with SLURM job scheduler.

I want to download reference {{focus_family}} genomes from NCBI for comparative analysis.
Similar to my previous {{reference_family}} work.

Provide detailed information including:

DOWNLOAD STRATEGY:
1. How many reference genomes should I download? (mammals, birds, environment)
2. What host diversity should I target? (human, mouse, cow, chicken, etc.)
3. Should I use NCBI datasets, GTDB, or both?
4. What metadata is essential to collect (host, diet, body site, completeness)?
5. Specific commands for downloading from NCBI using ncbi-datasets-cli

COMPUTATIONAL REQUIREMENTS FOR EACH STEP:
- Memory (GB RAM) needed
- Number of CPU cores
- Expected runtime
- Disk space requirements

Format key steps as:
STEP | TOOL | MEMORY | CPUS | RUNTIME | DISK SPACE",
);

const PIPELINE_RESOURCES_QUESTION: PromptTemplate = PromptTemplate::new(
    "I'll compare 284 herptile {{focus_family}} MAGs (836 MB) against reference genomes
from mammals, birds, and possibly environment.

For EACH major analysis step, I need exact resource requirements for SLURM:

ANALYSES NEEDED:
1. Phylogenomic tree construction (concatenated marker genes? FastTree? IQ-TREE?)
2. Functional annotation (Prokka? eggNOG-mapper? DRAM?)
3. CAZyme profiling with dbCAN
4. Metabolic pathway reconstruction (KEGG mapper? MetaCyc?)
5. Pan-genome analysis (Roary? PIRATE? Panaroo?)
6. Average Nucleotide Identity calculations (FastANI? pyani?)
7. Comparative genomics (OrthoFinder? ProteinOrtho?)

CRITICAL: For ~400-500 total genomes (284 herptile + 200 reference), provide:

For EACH step format as:
## Step X: [Analysis Name]
Tool: [name and version]
Memory: X GB RAM
CPUs: X cores
Runtime: X hours (for ~400-500 genomes)
Disk: X GB output
SLURM example:
```bash
#SBATCH --mem=XG
#SBATCH --cpus-per-task=X
#SBATCH --time=X:00:00
[command]
```",
);

const STATISTICS_RESOURCES_QUESTION: PromptTemplate = PromptTemplate::new(
    "After phylogenomics and functional comparisons of ~400-500 genomes,
I need statistical analysis to identify herptile-specific adaptations.

For each analysis, provide computational requirements:

1. Gene enrichment analysis (host-specific genes, CAZyme differences)
   - Which test? (Fisher's exact? DESeq2? ANCOM-BC?)
   - Memory and runtime?

2. Multivariate analysis (PCA, PERMANOVA on functional profiles)
   - R packages? vegan? ape? phytools?
   - Can this run on login node or needs compute?

3. Phylogenetic comparative methods
   - Test for phylogenetic signal in traits?
   - Host-microbe coevolution tests?

4. Visualization (phylogenetic trees, heatmaps, PCA plots)
   - Tools: ggtree? phytools? iTOL?
   - Memory requirements?

For each, specify:
- R/Python packages and versions
- Memory requirements (GB)
- Login node OK or compute node needed?
- Expected runtime",
);

const PRIORITIZE_QUESTION: PromptTemplate = PromptTemplate::new(
    "I have 284 high-quality herptile {{focus_family}} MAGs.

I want to publish this work, but I need to be strategic about time/resources.

What is the MINIMUM analysis pipeline that would:
1. Still be publishable in a good journal
2. Show what's unique about herptile {{focus_family}}
3. Can be completed in 2-3 months

Prioritize the analyses from the full plan. What can I skip? What's essential?",
);

/// Report file written by [`evaluate`].
pub const EVALUATION_FILE: &str = "project_evaluation.txt";
/// Report file written by [`plan`].
pub const PLAN_FILE: &str = "comparative_genomics_plan.txt";

fn question(template: PromptTemplate, study: &StudyContext) -> String {
    template.fill(&study.prompt_context())
}

async fn ask(router: &TaskRouter, task_type: TaskType, template: PromptTemplate) -> anyhow::Result<String> {
    reply_text(router.dispatch(task_type, &question(template, router.study())).await?)
}

/// Evaluate the scientific merit of the MAG project.
pub async fn evaluate(session: &Session) -> anyhow::Result<()> {
    let analyzer = session.analyzer()?;
    let study = analyzer.study().clone();

    banner(&format!("CRITICAL EVALUATION: {} MAG Study from Herptile Metagenomes", study.focus_family));
    part("PART 1: Scientific Merit & Publication Potential");

    let evaluation = reply_text(analyzer.literature_review(&question(EVALUATION_QUESTION, &study)).await?)?;
    println!("{evaluation}");

    let path = Report::new("SCIENTIFIC EVALUATION").body(evaluation).save(&session.results_dir(), EVALUATION_FILE)?;

    println!();
    println!("{}", "✓ Evaluation complete!".green().bold());
    println!("📄 Full report saved to: {}", path.display());
    Ok(())
}

/// Plan reference downloads and the comparative pipeline with resource needs.
pub async fn plan(session: &Session) -> anyhow::Result<()> {
    let router = session.router()?;

    banner(&format!("COMPARATIVE GENOMICS STRATEGY: {} Reference Genomes", router.study().focus_family));

    part("PART 1: Reference Genome Selection & Download Strategy");
    let strategy = ask(&router, TaskType::BioinformaticsAndPipelineDesign, DOWNLOAD_STRATEGY_QUESTION).await?;
    println!("{strategy}");

    part("PART 2: Comparative Analysis Pipeline & Resource Requirements");
    let pipeline = ask(&router, TaskType::BioinformaticsAndPipelineDesign, PIPELINE_RESOURCES_QUESTION).await?;
    println!("{pipeline}");

    part("PART 3: Statistical Analysis & Visualization Resources");
    let statistics = ask(&router, TaskType::StatisticalAnalysis, STATISTICS_RESOURCES_QUESTION).await?;
    println!("{statistics}");

    let report = Report::new("COMPARATIVE GENOMICS STRATEGY WITH RESOURCE REQUIREMENTS")
        .line(format!("Dataset: 284 high-quality herptile {} MAGs (836 MB)", router.study().focus_family))
        .line("Target: ~400-500 total genomes (284 herptile + 200 reference)")
        .section("PART 1: Download Strategy & Requirements", strategy)
        .section("PART 2: Comparative Analysis Pipeline & Resources", pipeline)
        .section("PART 3: Statistical Analysis & Visualization Resources", statistics);
    let path = report.save(&session.results_dir(), PLAN_FILE)?;

    println!();
    println!("{}", "✓ Complete strategy with resource requirements generated!".green().bold());
    println!("📄 Full plan saved to: {}", path.display());
    println!();
    println!("💡 Next steps:");
    println!("  1. Review resource requirements");
    println!("  2. Create SLURM job scripts (rumen download-job)");
    println!("  3. Download reference genomes");
    println!("  4. Run comparative analysis pipeline");
    Ok(())
}

/// Ask for the minimum publishable analysis pipeline.
pub async fn prioritize(session: &Session) -> anyhow::Result<()> {
    let router = session.router()?;
    let reply = ask(&router, TaskType::StatisticalAnalysis, PRIORITIZE_QUESTION).await?;
    print_reply(&reply, None, &session.results_dir())
}
