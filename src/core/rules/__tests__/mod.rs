mod momentum_test;
