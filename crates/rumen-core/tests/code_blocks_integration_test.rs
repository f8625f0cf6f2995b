//! Integration tests for pulling scripts out of replies.

use rumen_core::code_blocks::{CodeBlockParser, write_script};
use std::fs;
use tempfile::TempDir;

const REPLY: &str = r#"Here is the job script.

```bash
#!/bin/bash
#SBATCH --mem=16G
#SBATCH --cpus-per-task=8
#SBATCH -p batch
cat data/filtered_genomes/accession_list.txt | parallel -j 8 ./fetch.sh {}
```

And a helper for checking results:

```python
import csv
print("done")
```
"#;

#[test]
fn test_extract_and_write_bash_job() {
    let temp_dir = TempDir::new().unwrap();
    let job = temp_dir.path().join("jobs").join("03_download_final.sh");

    let block = CodeBlockParser::first_with_language(REPLY, "bash").unwrap();
    assert_eq!(block.index, 1);
    assert!(block.content.starts_with("#!/bin/bash"));
    assert!(!block.content.contains("import csv"));

    write_script(&job, &block.content, true).unwrap();
    let written = fs::read_to_string(&job).unwrap();
    assert!(written.contains("#SBATCH -p batch"));
    assert!(written.ends_with("{}\n"));
}

#[test]
fn test_python_block_is_second() {
    let block = CodeBlockParser::first_with_language(REPLY, "python").unwrap();
    assert_eq!(block.index, 2);
    assert_eq!(block.content, "import csv\nprint(\"done\")");
}

#[test]
fn test_reply_without_requested_language() {
    assert!(CodeBlockParser::first_with_language("Just prose, no script.", "bash").is_none());
    assert!(CodeBlockParser::first_with_language(REPLY, "r").is_none());
}
