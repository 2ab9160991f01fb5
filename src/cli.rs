//
// src/cli.rs: implementation of CLI utilities
//

use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};
use log::info;
use std::fs;

pub struct CliArgs {
    pub filename: String,
    pub validate: bool,
    pub output: Option<String>,
    pub log_level: String,
}

impl Default for CliArgs {
    fn default() -> Self
    {
        Self {
            filename: String::new(),
            validate: false,
            output: None,
            log_level: "warn".into(),
        }
    }
}

pub fn parse_cli() -> CliArgs
{
    let mut args = CliArgs::default();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Dump, validate, and rewrite ADIF (ADI) log files");
        ap.refer(&mut args.filename)
            .add_argument("file", Store, "ADI file to read")
            .required();
        ap.refer(&mut args.validate)
            .add_option(&["--validate"], StoreTrue,
                "Report field values that are invalid for their data type");
        ap.refer(&mut args.output)
            .add_option(&["-o", "--output"], StoreOption,
                "Rewrite the records to this ADI file");
        ap.refer(&mut args.log_level)
            .add_option(&["--log"], Store,
                "Log level (error|warn|info|debug|trace)");
        ap.parse_args_or_exit();
    }
    args
}

//
// Parse a single file, dump its contents, and then validate and rewrite it if
// asked to.
//
pub fn process_file(args: &CliArgs) ->
    Result<(), String>
{
    let filename = args.filename.as_str();
    let mut file = match fs::File::open(filename) {
        Ok(file) => file,
        Err(error) => {
            return Err(format!("open \"{}\": {}", filename, error))
        }
    };

    let adif = adif::adif_parse(filename, &mut file)
        .map_err(|e| format!("{}: {}", filename, e))?;

    print!("{}", adif);
    for rec in &adif.adif_records {
        print!("{}\n", rec);
    }

    if args.validate {
        let mut ninvalid = 0;
        for (i, rec) in adif.adif_records.iter().enumerate() {
            for field in adif::adif_validate_record(rec) {
                ninvalid += 1;
                println!("record {}: field {}: invalid value \"{}\" for \
                    type {}", i + 1, field, rec.get(&field).unwrap_or(""),
                    adif::data_type_of(&field));
            }
        }
        println!("Invalid values: {}", ninvalid);
    }

    if let Some(outname) = &args.output {
        let header = adif::AdifHeaderInfo::new(env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"));
        adif::adif_write_file(outname, &adif.adif_records, &header)
            .map_err(|e| format!("write \"{}\": {}", outname, e))?;
        info!("wrote {} records to {}", adif.adif_records.len(), outname);
    }

    Ok(())
}
