use simplex_nn::{Hypergraph, Matrix, UniGin};

fn main() {
    let hypergraph = Hypergraph::new(6, vec![
        vec![0, 1, 2],
        vec![2, 3],
        vec![3, 4, 5],
        vec![0, 5],
    ]).expect("valid hypergraph");

    println!("Nodes: {}, hyperedges: {}", hypergraph.num_nodes, hypergraph.num_hyperedges());

    let model = UniGin::new(4, 8, 2, 2);
    let x_0 = Matrix::random(hypergraph.num_nodes, 4);
    let incidence = hypergraph.incidence_matrix();

    let (nodes, edges) = model.embed(&x_0, &incidence).expect("embedding");
    println!("Node embeddings: {}x{}", nodes.rows, nodes.cols);
    println!("Hyperedge embeddings: {}x{}", edges.rows, edges.cols);

    let output = model.forward(&x_0, &incidence).expect("forward pass");
    println!("Output: {:?}", output);
}
