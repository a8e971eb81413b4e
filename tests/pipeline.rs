use std::io::Write;
use std::path::{Path, PathBuf};

use crewmap::data::SourcePaths;
use crewmap::*;
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

const CREW: &str = "tconst\tdirectors\twriters\n\
                    tt0001\tnm1,nm2\tnm3\n\
                    tt0002\tnm1\tnm3\n\
                    tt0003\tnm1\t\\N\n\
                    tt0099\tnm1\tnm3\n";

const PRINCIPALS: &str = "tconst\tordering\tnconst\tcategory\tjob\tcharacters\n\
                          tt0001\t1\tnm4\tactor\t\\N\t[\"Rick\"]\n\
                          tt0001\t2\tnm5\tactor\t\\N\t[\"Ilsa\"]\n\
                          tt0001\t3\tnm6\tdirector\t\\N\t\\N\n\
                          tt0002\t1\tnm6\tactress\t\\N\t\\N\n\
                          tt0003\t1\tnm5\tactor\t\\N\t\\N\n\
                          tt0099\t1\tnm4\tactor\t\\N\t\\N\n";

const NAMES: &str = "nconst\tprimaryName\tbirthYear\n\
                     nm1\tA\t1900\n\
                     nm2\tB\t1901\n\
                     nm3\tC\t1902\n\
                     nm4\tD\t1903\n\
                     nm5\tE\t1904\n";

struct Fixture {
    dir: TempDir,
    config: Config,
}

fn fixture(crew: &str, principals: &str, names: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, text: &str| -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path
    };
    let config = Config {
        sources: SourcePaths {
            crew: write("title.crew.tsv", crew),
            principals: write("title.principals.tsv", principals),
            names: write("name.basics.tsv", names),
        },
        output: dir.path().join("crew_info.csv"),
        movies: AllowList::new(["tt0001", "tt0002", "tt0003"]),
        ..Config::default()
    };
    Fixture { dir, config }
}

fn gzip(path: &Path) {
    let text = std::fs::read(path).unwrap();
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&text).unwrap();
    std::fs::write(path, enc.finish().unwrap()).unwrap();
}

#[test]
fn resolves_allow_listed_films_with_actors() -> Result<(), CrewError> {
    let fx = fixture(CREW, PRINCIPALS, NAMES);
    let summary = run(&fx.config)?;

    // tt0002 has no actor rows, tt0099 is not allow-listed
    assert_eq!(
        std::fs::read_to_string(&fx.config.output).unwrap(),
        ",tconst,directors,writers,actors\n\
         0,tt0001,\"['A', 'B']\",['C'],\"['D', 'E']\"\n\
         1,tt0003,['A'],[],['E']\n"
    );
    assert_eq!(
        summary,
        RunSummary {
            movies: 3,
            crew_rows: 3,
            principal_rows: 5,
            films: 2,
            people: 5,
            rows_written: 2,
        }
    );
    Ok(())
}

#[test]
fn gzip_sources_match_plain() -> Result<(), CrewError> {
    let plain = fixture(CREW, PRINCIPALS, NAMES);
    run(&plain.config)?;

    let zipped = fixture(CREW, PRINCIPALS, NAMES);
    gzip(&zipped.config.sources.crew);
    gzip(&zipped.config.sources.principals);
    gzip(&zipped.config.sources.names);
    run(&zipped.config)?;

    assert_eq!(
        std::fs::read(&plain.config.output).unwrap(),
        std::fs::read(&zipped.config.output).unwrap()
    );
    Ok(())
}

#[test]
fn unknown_actor_halts_before_output() {
    let names = NAMES.replace("nm5\tE\t1904\n", "");
    let fx = fixture(CREW, PRINCIPALS, &names);

    match run(&fx.config) {
        Err(CrewError::UnknownPerson { nconst, film }) => {
            assert_eq!(nconst, "nm5");
            assert_eq!(film, "tt0001");
        }
        other => panic!("expected UnknownPerson, got {other:?}"),
    }
    assert!(!fx.config.output.exists());
}

#[test]
fn placeholder_keeps_going() -> Result<(), CrewError> {
    let names = NAMES.replace("nm5\tE\t1904\n", "");
    let mut fx = fixture(CREW, PRINCIPALS, &names);
    fx.config.missing_name = MissingName::Placeholder("unknown".into());

    let summary = run(&fx.config)?;
    assert_eq!(summary.rows_written, 2);
    let text = std::fs::read_to_string(&fx.config.output).unwrap();
    assert!(text.contains("\"['D', 'unknown']\""));
    Ok(())
}

#[test]
fn kept_null_marker_is_looked_up() {
    let mut fx = fixture(CREW, PRINCIPALS, NAMES);
    fx.config.null_marker = NullMarker::Keep;

    match run(&fx.config) {
        Err(CrewError::UnknownPerson { nconst, film }) => {
            assert_eq!(nconst, "\\N");
            assert_eq!(film, "tt0003");
        }
        other => panic!("expected UnknownPerson, got {other:?}"),
    }
}

#[test]
fn missing_source_names_the_file() {
    let fx = fixture(CREW, PRINCIPALS, NAMES);
    std::fs::remove_file(&fx.config.sources.principals).unwrap();

    let err = run(&fx.config).unwrap_err();
    assert!(err.to_string().contains("title.principals.tsv"));
    assert!(matches!(err, CrewError::Io { .. }));
}

#[test]
fn allow_list_file_drives_the_run() -> Result<(), CrewError> {
    let mut fx = fixture(CREW, PRINCIPALS, NAMES);
    let list = fx.dir.path().join("movies.txt");
    std::fs::write(&list, "# only the one\ntt0099\n").unwrap();
    fx.config.movies = AllowList::from_file(&list)?;

    run(&fx.config)?;
    assert_eq!(
        std::fs::read_to_string(&fx.config.output).unwrap(),
        ",tconst,directors,writers,actors\n0,tt0099,['A'],['C'],['D']\n"
    );
    Ok(())
}
