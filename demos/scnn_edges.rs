use simplex_nn::{Matrix, Scnn, SimplicialComplex, UpdateFunction};

fn main() {
    // Two triangles glued along an edge, plus a dangling edge.
    let complex = SimplicialComplex::new(&[
        vec![0, 1, 2],
        vec![1, 2, 3],
        vec![3, 4],
    ]).expect("valid complex");

    let (down, up) = complex.laplacians(1).expect("edge laplacians");

    let model = Scnn::new(3, 16, 8, 2, 2, true, Some(UpdateFunction::ReLU), 2)
        .expect("valid architecture");

    let x = Matrix::random(complex.num_cells(1), 3);
    let output = model.forward(&x, down.as_ref(), up.as_ref()).expect("forward pass");

    println!("Edges: {:?}", complex.cells(1));
    println!("Complex readout: {:.4}", output[0]);
}
