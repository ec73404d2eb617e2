//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
/// Prepare WenetSpeech and MUSAN for ASR training.
///
/// ```sh
/// wenetspeech-prep 0.1.0
///
/// USAGE:
///     wenetspeech-prep [FLAGS] [OPTIONS]
///
/// FLAGS:
///         --builtin-char-tokenizer    split char transcripts without calling text2token.py
///     -h, --help                      Prints help information
///     -V, --version                   Prints version information
///
/// OPTIONS:
///         --dl-dir <dl-dir>            download directory. Default is $PWD/download.
///         --lhotse <lhotse>            lhotse executable [default: lhotse]
///         --local-dir <local-dir>      recipe scripts directory [default: local]
///         --num-jobs <num-jobs>        number of jobs for manifest preparation [default: 15]
///         --num-splits <num-splits>    number of pieces the L subset is split into [default: 1000]
///         --python <python>            python interpreter [default: python3]
///         --stage <stage>              first stage to run [default: 0]
///         --stop-stage <stop-stage>    last stage to run (inclusive) [default: 100]
///         --work-dir <work-dir>        directory holding data/ [default: .]
/// ```
#[structopt(
    name = "wenetspeech-prep",
    about = "WenetSpeech/MUSAN data preparation."
)]
pub struct Prepare {
    #[structopt(long = "stage", help = "first stage to run", default_value = "0")]
    pub stage: i32,
    #[structopt(
        long = "stop-stage",
        help = "last stage to run (inclusive)",
        default_value = "100"
    )]
    pub stop_stage: i32,
    #[structopt(
        long = "num-splits",
        help = "number of pieces the L subset is split into",
        default_value = "1000"
    )]
    pub num_splits: usize,
    #[structopt(
        long = "dl-dir",
        parse(from_os_str),
        help = "download directory. Default is $PWD/download."
    )]
    pub dl_dir: Option<PathBuf>,
    #[structopt(
        long = "num-jobs",
        help = "number of jobs for manifest preparation",
        default_value = "15"
    )]
    pub num_jobs: usize,
    #[structopt(
        long = "work-dir",
        parse(from_os_str),
        help = "directory holding data/",
        default_value = "."
    )]
    pub work_dir: PathBuf,
    #[structopt(long = "python", help = "python interpreter", default_value = "python3")]
    pub python: String,
    #[structopt(long = "lhotse", help = "lhotse executable", default_value = "lhotse")]
    pub lhotse: String,
    #[structopt(
        long = "local-dir",
        parse(from_os_str),
        help = "recipe scripts directory",
        default_value = "local"
    )]
    pub local_dir: PathBuf,
    #[structopt(
        long = "builtin-char-tokenizer",
        help = "split char transcripts without calling text2token.py"
    )]
    pub builtin_char_tokenizer: bool,
}
