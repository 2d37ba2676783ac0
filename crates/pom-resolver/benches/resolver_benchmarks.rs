//! Benchmarks for pom.xml parsing and the resolution hot paths
//! (interpolation, hierarchical dependency management).

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use pom_resolver::{ActiveProfiles, MemoryLog, Project, ProjectContainer, ProjectRegistry};
use std::hint::black_box;

fn pom_with_dependencies(count: usize) -> String {
    let mut xml = String::from(
        "<project>\n  <groupId>bench</groupId>\n  <artifactId>app</artifactId>\n  <version>1.0</version>\n  <properties>\n",
    );
    for i in 0..count {
        xml.push_str(&format!("    <dep{i}.version>{i}.0</dep{i}.version>\n"));
    }
    xml.push_str("  </properties>\n  <dependencies>\n");
    for i in 0..count {
        xml.push_str(&format!(
            "    <dependency>\n      <groupId>bench.group</groupId>\n      <artifactId>dep{i}</artifactId>\n      <version>${{dep{i}.version}}</version>\n    </dependency>\n"
        ));
    }
    xml.push_str("  </dependencies>\n</project>\n");
    xml
}

fn three_level_universe() -> ProjectRegistry {
    let grandparent = r"<project>
  <groupId>bench</groupId><artifactId>grandparent</artifactId><version>1</version>
  <dependencyManagement><dependencies>
    <dependency><groupId>x</groupId><artifactId>a</artifactId><version>1</version></dependency>
    <dependency><groupId>x</groupId><artifactId>b</artifactId><version>1</version></dependency>
  </dependencies></dependencyManagement>
</project>";
    let parent = r"<project>
  <parent><groupId>bench</groupId><artifactId>grandparent</artifactId><version>1</version></parent>
  <artifactId>parent</artifactId>
  <dependencyManagement><dependencies>
    <dependency><groupId>x</groupId><artifactId>b</artifactId><version>2</version></dependency>
    <dependency><groupId>x</groupId><artifactId>c</artifactId><version>2</version></dependency>
  </dependencies></dependencyManagement>
</project>";
    let child = r"<project>
  <parent><groupId>bench</groupId><artifactId>parent</artifactId><version>1</version></parent>
  <artifactId>child</artifactId>
  <dependencyManagement><dependencies>
    <dependency><groupId>x</groupId><artifactId>c</artifactId><version>3</version></dependency>
  </dependencies></dependencyManagement>
  <dependencies>
    <dependency><groupId>x</groupId><artifactId>a</artifactId></dependency>
    <dependency><groupId>x</groupId><artifactId>b</artifactId></dependency>
    <dependency><groupId>x</groupId><artifactId>c</artifactId></dependency>
  </dependencies>
</project>";

    let mut registry = ProjectRegistry::new();
    for (xml, path) in [
        (grandparent, "grandparent/pom.xml"),
        (parent, "parent/pom.xml"),
        (child, "child/pom.xml"),
    ] {
        let model = pom_resolver::parse_pom(xml).unwrap();
        registry.register(Project::from_model(model, path, false).unwrap());
    }
    registry
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_pom");
    for size in [5usize, 50, 200] {
        let xml = pom_with_dependencies(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &xml, |b, xml| {
            b.iter(|| pom_resolver::parse_pom(black_box(xml)).unwrap());
        });
    }
    group.finish();
}

fn bench_interpolation(c: &mut Criterion) {
    let xml = pom_with_dependencies(50);

    c.bench_function("interpolated_dependencies/50", |b| {
        b.iter_batched(
            || {
                let model = pom_resolver::parse_pom(&xml).unwrap();
                Project::from_model(model, "bench/pom.xml", false).unwrap()
            },
            |project| {
                let registry = ProjectRegistry::new();
                let log = MemoryLog::new();
                black_box(project.interpolated_dependencies(&registry, &log))
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("interpolation_cache_hit", |b| {
        let model = pom_resolver::parse_pom(&xml).unwrap();
        let project = Project::from_model(model, "bench/pom.xml", false).unwrap();
        let registry = ProjectRegistry::new();
        let log = MemoryLog::new();
        project.interpolate_value_ex("${dep0.version}", &registry, &log);
        b.iter(|| {
            black_box(project.interpolate_value_ex(
                black_box("${dep0.version}"),
                &registry,
                &log,
            ))
        });
    });
}

fn bench_hierarchical_dm(c: &mut Criterion) {
    c.bench_function("hierarchical_dm/three_levels", |b| {
        b.iter_batched(
            three_level_universe,
            |registry| {
                let log = MemoryLog::new();
                let child = registry
                    .for_gav(&pom_model::Gav::new("bench", "child", "1"))
                    .unwrap();
                black_box(child.local_dependencies(
                    &ActiveProfiles::new(),
                    &registry,
                    &log,
                    true,
                ))
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_parse, bench_interpolation, bench_hierarchical_dm);
criterion_main!(benches);
