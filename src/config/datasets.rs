use crate::core::Dataset;

const BASE: &str = "https://data.nextstrain.org/files";

/// Public Nextstrain metadata files offered in the dataset selector.
const REMOTE_DATASETS: &[(&str, &str)] = &[
    ("workflows/dengue/metadata_all.tsv.zst", "dengue/all"),
    ("workflows/dengue/metadata_denv1.tsv.zst", "dengue/denv1"),
    ("workflows/dengue/metadata_denv2.tsv.zst", "dengue/denv2"),
    ("workflows/dengue/metadata_denv3.tsv.zst", "dengue/denv3"),
    ("workflows/dengue/metadata_denv4.tsv.zst", "dengue/denv4"),
    (
        "workflows/forecasts-ncov/open/nextstrain_clades/global.tsv.gz",
        "forecasts-ncov/open/nextstrain_clades/global",
    ),
    (
        "workflows/forecasts-ncov/open/nextstrain_clades/usa.tsv.gz",
        "forecasts-ncov/open/nextstrain_clades/usa",
    ),
    (
        "workflows/forecasts-ncov/open/pango_lineages/global.tsv.gz",
        "forecasts-ncov/open/pango_lineages/global",
    ),
    (
        "workflows/forecasts-ncov/open/pango_lineages/usa.tsv.gz",
        "forecasts-ncov/open/pango_lineages/usa",
    ),
    ("workflows/measles/metadata.tsv.zst", "measles"),
    ("workflows/mpox/metadata.tsv.gz", "mpox"),
    ("ncov/open/global/metadata.tsv.xz", "ncov/open/global"),
    ("ncov/open/africa/metadata.tsv.xz", "ncov/open/africa"),
    ("ncov/open/asia/metadata.tsv.xz", "ncov/open/asia"),
    ("ncov/open/europe/metadata.tsv.xz", "ncov/open/europe"),
    ("ncov/open/north-america/metadata.tsv.xz", "ncov/open/north-america"),
    ("ncov/open/oceania/metadata.tsv.xz", "ncov/open/oceania"),
    ("ncov/open/south-america/metadata.tsv.xz", "ncov/open/south-america"),
    ("workflows/rsv/a/metadata.tsv.gz", "rsv/a"),
    ("workflows/rsv/b/metadata.tsv.gz", "rsv/b"),
    ("workflows/zika/metadata.tsv.zst", "zika"),
];

pub fn default_datasets() -> Vec<Dataset> {
    REMOTE_DATASETS
        .iter()
        .map(|(path, label)| Dataset {
            url: format!("{}/{}", BASE, path),
            label: label.to_string(),
        })
        .collect()
}
