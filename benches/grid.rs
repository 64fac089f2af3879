use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustpisa::atom::{Atom, Element};
use rustpisa::contacts::find_close_contacts;
use rustpisa::grid::NeighborGrid;
use rustpisa::molecule::Molecule;

fn random_cloud(name: &str, n: usize, half_width: f64, seed: u64) -> Molecule {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut mol = Molecule::new(name);
    for i in 0..n {
        mol.add_atom(Atom::new(
            Element::Carbon,
            Vector3::new(
                rng.gen_range(-half_width..half_width),
                rng.gen_range(-half_width..half_width),
                rng.gen_range(-half_width..half_width),
            ),
            "C".to_string(),
            i as u32 + 1,
            "ALA".to_string(),
            i as i32 / 8 + 1,
            'A',
        ));
    }
    mol
}

fn bench_grid_creation(c: &mut Criterion) {
    let receptor = random_cloud("rec", 5000, 25.0, 1);

    c.bench_function("grid_creation", |b| {
        b.iter(|| {
            let grid = NeighborGrid::from_atoms(&receptor.atoms, 4.0);
            black_box(grid)
        })
    });
}

fn bench_neighbor_query(c: &mut Criterion) {
    let receptor = random_cloud("rec", 5000, 25.0, 1);
    let grid = NeighborGrid::from_atoms(&receptor.atoms, 4.0).unwrap();
    let point = Vector3::new(1.0, -2.0, 0.5);

    c.bench_function("neighbor_query", |b| {
        b.iter(|| black_box(grid.neighbors_within(&receptor.atoms, &point, 4.0)))
    });
}

fn bench_close_contacts(c: &mut Criterion) {
    let receptor = random_cloud("rec", 5000, 25.0, 1);
    let ligand = random_cloud("lig", 60, 4.0, 2);

    c.bench_function("close_contacts_brute_force", |b| {
        b.iter(|| black_box(find_close_contacts(&receptor, &ligand, 4.0, usize::MAX)))
    });

    c.bench_function("close_contacts_grid", |b| {
        b.iter(|| black_box(find_close_contacts(&receptor, &ligand, 4.0, 0)))
    });
}

criterion_group!(
    grid_benches,
    bench_grid_creation,
    bench_neighbor_query,
    bench_close_contacts
);
criterion_main!(grid_benches);
