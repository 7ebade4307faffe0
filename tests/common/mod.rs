/// Shared fixtures for the integration tests: a throwaway results tree laid
/// out the way the annotation pipelines write it.
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const KOFAM_MAPPER: &str = "GENE1\tK00001\nGENE2\nGENE3\tK00002\n";

pub const INTERPROSCAN_TSV: &str = "\
GENE1\tmd5\t300\tPfam\tPF00069\tkinase\t1\t250\t1.2E-40\tT\t01-01-2024\tIPR000719\tProtein kinase\tGO:0005524|GO:0004672\t-
GENE1\tmd5\t300\tSMART\tSM00220\tkinase\t1\t250\t3.0E-50\tT\t01-01-2024\tIPR000719\tProtein kinase\tGO:0004672,GO:0006468\tReactome: R-HSA-1
GENE4\tmd5\t120\tPfam\tPF00001\t7tm\t5\t110\t2.0E-5\tT\t01-01-2024\t-\t-\t-\t-
";

pub const EGGNOG_V5: &str = "\
## emapper-2.1.12
## command: emapper.py -i proteins.faa
#query\tseed_ortholog\tevalue\tscore\teggNOG_OGs\tmax_annot_lvl\tCOG_category\tDescription\tPreferred_name\tGOs\tEC\tKEGG_ko\tKEGG_Pathway\tKEGG_Module\tKEGG_Reaction\tKEGG_rclass\tBRITE\tKEGG_TC\tCAZy\tBiGG_Reaction\tPFAMs
GENE1\t9606.P1\t1e-80\t300\tOG1\tEuk\tT\tProtein kinase\tKIN\tGO:0005524,GO:0004672\t2.7.11.1\tko:K00001\tmap04010\t-\t-\t-\t-\t-\t-\t-\tPkinase
GENE5\t9606.P5\t1e-20\t80\tOG5\tEuk\tS\t-\t-\t-\t-\tko:K00005\t-\t-\t-\t-\t-\t-\t-\t-\t-
## 2 queries scanned
";

pub const FANTASIA_TSV: &str = "\
accession\tgo_id\tterm_count\tfinal_score_ESM_L0\tfinal_score_Prot-T5_L0\tfinal_score_Prost-T5_L0\tfinal_score_Ankh3-Large_L0\tfinal_score_ESM3c_L0\tproteins
GENE1\tGO:0005524\t5\t0.90\t0.80\t0.85\t0.70\t0.95\tQ1
GENE6\tGO:0008150\t1\t0.20\t0.10\t\t0.30\t0.25\tQ6
GENE7\tGO:0003674\t2\t0.60\t\t0.40\t0.50\t0.55\tQ7
";

pub const PROTEINS_FAA: &str = "\
>GENE1 gene=g1 product=kinase
MKV
>GENE2 gene=g2
MKA
>GENE3
MKL
>GENE4 gene=g4
MKI
>GENE5 gene=g5
MKE
>GENE6 gene=g6
MKQ
>GENE7 gene=g7
MKW
>GENE8 gene=g8
MKY
";

/// Temporary results root plus an output area
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        TestEnvironment {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    pub fn results(&self) -> PathBuf {
        self.path("results")
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        std::fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    pub fn write_gz(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        write_gzip(&path, content);
        path
    }

    /// Results tree with one output per tool, all for sample `s1`
    pub fn with_all_tools(self) -> Self {
        self.write("results/kofamscan/s1_kofam_mapper.tsv", KOFAM_MAPPER);
        self.write("results/interproscan/s1.tsv", INTERPROSCAN_TSV);
        self.write("results/eggnog/v5/run/s1.emapper.annotations", EGGNOG_V5);
        self.write("results/fantasia/s1.tsv", FANTASIA_TSV);
        self.write("proteins.faa", PROTEINS_FAA);
        self
    }
}

pub fn write_gzip(path: &Path, content: &str) {
    let file = std::fs::File::create(path).expect("Failed to create gzip fixture");
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(content.as_bytes()).expect("Failed to compress fixture");
    encoder.finish().expect("Failed to finish gzip stream");
}

/// A 15-column EggNOG v7 row with the given KEGG and GO cells
pub fn eggnog7_row(gene: &str, kegg: &str, go: &str) -> String {
    let mut cols: Vec<String> = (0..15).map(|i| format!("c{}", i)).collect();
    cols[0] = gene.to_string();
    cols[1] = format!("{}.orth", gene);
    cols[12] = kegg.to_string();
    cols[14] = go.to_string();
    cols.join("\t") + "\n"
}
